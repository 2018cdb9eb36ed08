//! Process-wide relay configuration.
//!
//! [`RelayConfig`] is built once at startup, wrapped in an `Arc`, and handed
//! to every component that needs a credential or an endpoint. Nothing reads
//! the environment after that point; the binary owns all env parsing.

use crate::error::RelayError;
use crate::prompts::PromptStyle;
use std::fmt;

/// Default Telegram Bot API origin.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Default OpenAI API origin.
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Accepted range for [`RelayConfig::max_rendered_pixels`].
pub const RENDERED_PIXELS_RANGE: std::ops::RangeInclusive<u32> = 100..=10_000;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration shared by every request handler.
///
/// Built via [`RelayConfig::builder()`]. Both secrets are mandatory;
/// [`RelayConfigBuilder::build`] rejects empty values.
#[derive(Clone)]
pub struct RelayConfig {
    /// Telegram bot token. Embedded in every Bot API URL.
    pub bot_token: String,

    /// Bearer credential for the completion API.
    pub openai_api_key: String,

    /// Chat that `/upload` results are mirrored to, if any.
    pub chat_id: Option<i64>,

    /// Listening port. Default: 8080.
    pub port: u16,

    /// Multimodal model identifier. Default: `gpt-4o-mini`.
    pub model: String,

    /// Bot API origin, without trailing slash.
    pub telegram_api_base: String,

    /// Completion API origin, without trailing slash.
    pub openai_api_base: String,

    /// Instruction used for photos sent to the bot. Default: free text.
    pub photo_prompt: PromptStyle,

    /// Instruction used for `/upload`. Default: structured JSON.
    pub upload_prompt: PromptStyle,

    /// Send the rasterised PDF page back to the chat before the text reply. Default: true.
    pub send_rendered_page: bool,

    /// Longest edge of the rendered PDF page in pixels. Default: 2000.
    pub max_rendered_pixels: u32,

    /// Explicit pdfium library path. `None` binds the system library.
    pub pdfium_lib_path: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            openai_api_key: String::new(),
            chat_id: None,
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            telegram_api_base: DEFAULT_TELEGRAM_API_BASE.to_string(),
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            photo_prompt: PromptStyle::FreeText,
            upload_prompt: PromptStyle::Structured,
            send_rendered_page: true,
            max_rendered_pixels: 2000,
            pdfium_lib_path: None,
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("port", &self.port)
            .field("model", &self.model)
            .field("telegram_api_base", &self.telegram_api_base)
            .field("openai_api_base", &self.openai_api_base)
            .field("photo_prompt", &self.photo_prompt)
            .field("upload_prompt", &self.upload_prompt)
            .field("send_rendered_page", &self.send_rendered_page)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .finish()
    }
}

impl RelayConfig {
    /// Create a new builder for `RelayConfig`.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RelayConfig`].
#[derive(Debug)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    pub fn bot_token(mut self, token: impl Into<String>) -> Self {
        self.config.bot_token = token.into().trim().to_string();
        self
    }

    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.openai_api_key = key.into().trim().to_string();
        self
    }

    pub fn chat_id(mut self, chat_id: Option<i64>) -> Self {
        self.config.chat_id = chat_id;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn telegram_api_base(mut self, base: impl Into<String>) -> Self {
        self.config.telegram_api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn openai_api_base(mut self, base: impl Into<String>) -> Self {
        self.config.openai_api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn photo_prompt(mut self, style: PromptStyle) -> Self {
        self.config.photo_prompt = style;
        self
    }

    pub fn upload_prompt(mut self, style: PromptStyle) -> Self {
        self.config.upload_prompt = style;
        self
    }

    pub fn send_rendered_page(mut self, v: bool) -> Self {
        self.config.send_rendered_page = v;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px;
        self
    }

    pub fn pdfium_lib_path(mut self, path: Option<String>) -> Self {
        self.config.pdfium_lib_path = path.filter(|p| !p.trim().is_empty());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RelayConfig, RelayError> {
        let c = &self.config;
        if c.bot_token.is_empty() {
            return Err(RelayError::InvalidConfig(
                "TELEGRAM_BOT_TOKEN is required".into(),
            ));
        }
        if c.openai_api_key.is_empty() {
            return Err(RelayError::InvalidConfig("OPENAI_API_KEY is required".into()));
        }
        if !RENDERED_PIXELS_RANGE.contains(&c.max_rendered_pixels) {
            return Err(RelayError::InvalidConfig(format!(
                "max_rendered_pixels must be between {} and {}, got {}",
                RENDERED_PIXELS_RANGE.start(),
                RENDERED_PIXELS_RANGE.end(),
                c.max_rendered_pixels
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> RelayConfigBuilder {
        RelayConfig::builder().bot_token("123:abc").openai_api_key("sk-test")
    }

    #[test]
    fn defaults_match_documented_values() {
        let c = minimal().build().unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.model, "gpt-4o-mini");
        assert_eq!(c.telegram_api_base, "https://api.telegram.org");
        assert_eq!(c.photo_prompt, PromptStyle::FreeText);
        assert_eq!(c.upload_prompt, PromptStyle::Structured);
        assert!(c.send_rendered_page);
        assert!(c.chat_id.is_none());
    }

    #[test]
    fn missing_bot_token_is_rejected() {
        let err = RelayConfig::builder()
            .openai_api_key("sk-test")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn whitespace_api_key_is_rejected() {
        let err = RelayConfig::builder()
            .bot_token("123:abc")
            .openai_api_key("   ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let c = minimal()
            .telegram_api_base("http://127.0.0.1:9000/")
            .openai_api_base("http://127.0.0.1:9001//")
            .build()
            .unwrap();
        assert_eq!(c.telegram_api_base, "http://127.0.0.1:9000");
        assert_eq!(c.openai_api_base, "http://127.0.0.1:9001");
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = minimal().build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("123:abc"));
        assert!(!dbg.contains("sk-test"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn tiny_render_cap_is_rejected() {
        assert!(minimal().max_rendered_pixels(10).build().is_err());
    }

    #[test]
    fn oversized_render_cap_is_rejected() {
        let err = minimal().max_rendered_pixels(u32::MAX).build().unwrap_err();
        assert!(err.to_string().contains("max_rendered_pixels"), "got: {err}");
        assert!(minimal().max_rendered_pixels(10_000).build().is_ok());
        assert!(minimal().max_rendered_pixels(10_001).build().is_err());
    }
}
