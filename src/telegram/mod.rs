//! Telegram Bot API client handle.
//!
//! [`TelegramClient`] only knows how to build Bot API URLs and owns the
//! shared `reqwest::Client`. The calls themselves live in the pipeline
//! stages that need them ([`crate::pipeline::resolve`],
//! [`crate::pipeline::notify`]).

mod types;

pub use types::{
    Attachment, Chat, Document, GetFileResponse, Message, PhotoSize, TelegramFile, Update, User,
    PDF_MIME_TYPE,
};

use crate::config::RelayConfig;

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self::new(http, config.telegram_api_base.clone(), config.bot_token.clone())
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// `{base}/bot{token}/{method}`
    pub(crate) fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// `{base}/file/bot{token}/{file_path}`
    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.base_url, self.token, file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_bot_api_layout() {
        let client = TelegramClient::new(reqwest::Client::new(), "https://api.telegram.org", "123:abc");
        assert_eq!(
            client.method_url("getFile"),
            "https://api.telegram.org/bot123:abc/getFile"
        );
        assert_eq!(
            client.file_url("photos/file_7.jpg"),
            "https://api.telegram.org/file/bot123:abc/photos/file_7.jpg"
        );
    }
}
