//! Product description generation
//!
//! Without an API key every product gets a templated blurb. With a key the
//! description is requested from a chat-completion service; any failure there
//! falls back to a second template so a single item never stops the batch.

use crate::config::TextGenerationConfig;
use crate::error::{BulkUploadError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// System message framing the assistant
pub const SYSTEM_PROMPT: &str = "You're a creative fashion copywriter.";

/// Description used when no text-generation service is configured
#[must_use]
pub fn template_description(title: &str, gender: &str, category: &str) -> String {
    format!("{title}: A trendy {category} for {gender}, perfect for every wardrobe!")
}

/// Description used when the text-generation service fails
#[must_use]
pub fn fallback_description(title: &str, gender: &str, category: &str) -> String {
    format!("{title}: Stylish {category} for {gender}, made for modern taste.")
}

/// User message asking for a short description of one product
#[must_use]
pub fn build_prompt(title: &str, gender: &str, category: &str) -> String {
    format!(
        "Write a cool, modern product description (2-3 lines) for a Pakistani fashion website. \
         Product: {title}. Gender: {gender}. Category: {category}. \
         Highlight the style, vibe, and where you could wear it. Keep it catchy and aesthetic."
    )
}

/// Trait for text-generation services
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a chat made of a system and a user message
    ///
    /// # Errors
    /// - `BulkUploadError::DescriptionGeneration` for transport, status or
    ///   response format failures
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    #[must_use]
    pub fn new(client: Client, config: &TextGenerationConfig) -> Self {
        Self {
            client,
            url: config.completions_url(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BulkUploadError::description(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BulkUploadError::description(format!(
                "service returned {status}: {body}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BulkUploadError::description(format!("malformed response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(BulkUploadError::description("response contained no text"));
        }

        Ok(content)
    }
}

/// Produces a description for each product
pub struct DescriptionGenerator {
    backend: Option<Box<dyn TextGenerator>>,
    max_tokens: u32,
}

impl DescriptionGenerator {
    /// Templated descriptions only
    #[must_use]
    pub fn template_only() -> Self {
        Self {
            backend: None,
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
        }
    }

    /// Build from configuration: enhanced mode when an API key is present
    #[must_use]
    pub fn from_config(client: Client, config: &TextGenerationConfig) -> Self {
        let backend: Option<Box<dyn TextGenerator>> = if config.is_enabled() {
            Some(Box::new(OpenAiChatClient::new(client, config)))
        } else {
            None
        };

        Self {
            backend,
            max_tokens: config.max_tokens,
        }
    }

    /// Use a custom text-generation backend
    #[must_use]
    pub fn with_backend(backend: Box<dyn TextGenerator>, max_tokens: u32) -> Self {
        Self {
            backend: Some(backend),
            max_tokens,
        }
    }

    /// Whether descriptions come from a text-generation service
    #[must_use]
    pub fn is_enhanced(&self) -> bool {
        self.backend.is_some()
    }

    /// Describe one product; never fails
    pub async fn describe(&self, title: &str, gender: &str, category: &str) -> String {
        let Some(backend) = &self.backend else {
            return template_description(title, gender, category);
        };

        let prompt = build_prompt(title, gender, category);
        match backend.complete(SYSTEM_PROMPT, &prompt, self.max_tokens).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%title, error = %e, "Falling back to template description");
                fallback_description(title, gender, category)
            },
        }
    }
}
