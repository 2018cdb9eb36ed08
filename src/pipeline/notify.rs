//! Outbound messaging: text replies and photos back to the originating chat.
//!
//! Callers decide what to do with a [`RelayError::Notify`]; the dispatcher
//! only logs it. Nothing here retries.

use crate::error::RelayError;
use crate::telegram::TelegramClient;
use serde::Serialize;
use tracing::debug;

const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
}

/// Post a Markdown text message via `sendMessage`.
pub async fn send_message(client: &TelegramClient, chat_id: i64, text: &str) -> Result<(), RelayError> {
    let request = SendMessageRequest {
        chat_id,
        text,
        parse_mode: PARSE_MODE,
    };

    let response = client
        .http()
        .post(client.method_url("sendMessage"))
        .json(&request)
        .send()
        .await
        .map_err(|e| notify_error(chat_id, e))?;

    check_status(chat_id, response).await?;
    debug!("sendMessage → chat {}", chat_id);
    Ok(())
}

/// Post an image via `sendPhoto` as a multipart upload.
pub async fn send_photo(
    client: &TelegramClient,
    chat_id: i64,
    png: Vec<u8>,
    caption: Option<&str>,
) -> Result<(), RelayError> {
    let part = reqwest::multipart::Part::bytes(png)
        .file_name("converted_image.png")
        .mime_str("image/png")
        .map_err(|e| notify_error(chat_id, e))?;

    let mut form = reqwest::multipart::Form::new().text("chat_id", chat_id.to_string());
    if let Some(caption) = caption.filter(|c| !c.is_empty()) {
        form = form.text("caption", caption.to_string());
    }
    let form = form.part("photo", part);

    let response = client
        .http()
        .post(client.method_url("sendPhoto"))
        .multipart(form)
        .send()
        .await
        .map_err(|e| notify_error(chat_id, e))?;

    check_status(chat_id, response).await?;
    debug!("sendPhoto → chat {}", chat_id);
    Ok(())
}

fn notify_error(chat_id: i64, e: reqwest::Error) -> RelayError {
    RelayError::Notify {
        chat_id,
        reason: e.without_url().to_string(),
    }
}

async fn check_status(chat_id: i64, response: reqwest::Response) -> Result<(), RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(RelayError::Notify {
        chat_id,
        reason: format!("HTTP {status}: {body}"),
    })
}
