//! Catalog bulk upload CLI
//!
//! Extracts a product image archive and posts every product to the catalog
//! ingestion endpoint.

#[cfg(feature = "cli")]
use catalog_bulk_upload::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Please rebuild with --features cli");
    std::process::exit(1);
}
