//! CLI run against a mock endpoint
//!
//! The CLI installs a global tracing subscriber, so this binary holds a single run.

#![cfg(feature = "cli")]

mod common;

use catalog_bulk_upload::cli::{run, Cli};
use clap::Parser;
use common::{products_url, Workspace, FAKE_PNG};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cli_run_reports_partial_failures_without_error() {
    let workspace = Workspace::with_files(&[
        ("kids/shoes/sneakers/light_up.png", FAKE_PNG),
        ("kids/shoes/sandals/beach-sandal.jpeg", FAKE_PNG),
    ]);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(body_string_contains("Sneakers Light Up"))
        .respond_with(ResponseTemplate::new(422).set_body_string("duplicate title"))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let archive = workspace.archive.to_string_lossy().into_owned();
    let scratch = workspace.scratch.to_string_lossy().into_owned();
    let endpoint = products_url(&server.uri());
    let cli = Cli::try_parse_from([
        "catalog-bulk-upload",
        "--archive",
        archive.as_str(),
        "--scratch-dir",
        scratch.as_str(),
        "--endpoint",
        endpoint.as_str(),
        "--no-progress",
    ])
    .unwrap();

    let summary = run(&cli).await.unwrap();

    assert_eq!(summary.uploaded, vec!["Sandals Beach Sandal"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].body.as_deref(), Some("duplicate title"));
    assert!(!workspace.scratch.exists());
}
