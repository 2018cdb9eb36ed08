//! Vision extraction: one chat-completion call per image.
//!
//! The request is a single user turn holding a text part (the instruction
//! chosen by [`PromptStyle`]) and an image part (a remote URL or a `data:`
//! URI). The first choice's content is returned verbatim; even structured
//! prompts are not parsed or validated here.
//!
//! Every call is attempted exactly once. A transient provider failure turns
//! into a failure notice for the user, who can simply resend the image.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::pipeline::encode;
use crate::prompts::PromptStyle;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The image the model is asked to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// A URL the provider fetches itself.
    Url(String),
    /// Bytes embedded in the request as a data URI.
    Inline { mime_type: String, bytes: Vec<u8> },
}

impl ImageSource {
    pub fn inline(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        ImageSource::Inline {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// The value placed in `image_url.url`.
    pub fn to_api_url(&self) -> String {
        match self {
            ImageSource::Url(url) => url.clone(),
            ImageSource::Inline { mime_type, bytes } => encode::data_uri(mime_type, bytes),
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the single-turn request body.
pub(crate) fn build_request<'a>(
    model: &'a str,
    prompt: PromptStyle,
    image: &ImageSource,
) -> CompletionRequest<'a> {
    CompletionRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: prompt.instruction(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.to_api_url(),
                    },
                },
            ],
        }],
    }
}

/// Client for the chat-completions endpoint.
#[derive(Clone)]
pub struct VisionExtractor {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl VisionExtractor {
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}/v1/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self::new(
            http,
            &config.openai_api_base,
            config.openai_api_key.clone(),
            config.model.clone(),
        )
    }

    /// Ask the model to read `image` using the `prompt` instruction.
    ///
    /// # Errors
    /// - [`RelayError::ProviderHttp`]: the request could not be sent or its body read
    /// - [`RelayError::ProviderResponse`]: non-success status
    /// - [`RelayError::ProviderParse`]: body is not a chat completion
    /// - [`RelayError::NoChoices`]: zero choices
    pub async fn extract(&self, image: &ImageSource, prompt: PromptStyle) -> Result<String, RelayError> {
        let request = build_request(&self.model, prompt, image);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(RelayError::ProviderHttp)?;

        let status = response.status();
        let body = response.text().await.map_err(RelayError::ProviderHttp)?;

        if !status.is_success() {
            return Err(RelayError::ProviderResponse {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(RelayError::ProviderParse)?;

        let first = parsed.choices.into_iter().next().ok_or(RelayError::NoChoices)?;
        let content = first.message.content.unwrap_or_default();
        debug!("Extraction returned {} chars", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_has_text_then_image_part() {
        let image = ImageSource::Url("https://example.com/p.jpg".into());
        let body = serde_json::to_value(build_request("gpt-4o-mini", PromptStyle::FreeText, &image)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": PromptStyle::FreeText.instruction()},
                        {"type": "image_url", "image_url": {"url": "https://example.com/p.jpg"}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn inline_source_becomes_data_uri() {
        let image = ImageSource::inline("image/png", vec![1, 2, 3]);
        assert_eq!(image.to_api_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn endpoint_is_chat_completions() {
        let x = VisionExtractor::new(reqwest::Client::new(), "http://localhost:1234/", "k", "m");
        assert_eq!(x.endpoint, "http://localhost:1234/v1/chat/completions");
    }
}
