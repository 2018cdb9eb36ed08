//! Telegram Bot API wire types.
//!
//! Only the fields the relay reads are modelled; unknown fields are ignored
//! so new Bot API additions never turn a valid update into a `400`.

use serde::{Deserialize, Deserializer, Serialize};

/// MIME type of the only paginated format the relay understands.
pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: i64,
    #[serde(default)]
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
    /// Resolution variants of one photo, ascending by size.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub photo: Vec<PhotoSize>,
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// `null` and a missing key both read as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoSize {
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_unique_id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

impl Document {
    pub fn is_pdf(&self) -> bool {
        self.mime_type.as_deref() == Some(PDF_MIME_TYPE)
    }
}

/// The single attachment a message is handled for.
#[derive(Debug, Clone, Copy)]
pub enum Attachment<'a> {
    /// Largest variant of the photo.
    Photo(&'a PhotoSize),
    /// A PDF document.
    Document(&'a Document),
}

impl Message {
    /// Pick the attachment to process, if any.
    ///
    /// Photos are checked first, so a message carrying both a photo and a
    /// PDF is handled as a photo. Telegram orders photo variants by
    /// ascending size, so the last one is the largest.
    pub fn attachment(&self) -> Option<Attachment<'_>> {
        if let Some(largest) = self.photo.last() {
            return Some(Attachment::Photo(largest));
        }
        match &self.document {
            Some(doc) if doc.is_pdf() => Some(Attachment::Document(doc)),
            _ => None,
        }
    }
}

/// Body of a `getFile` response.
#[derive(Debug, Deserialize)]
pub struct GetFileResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<TelegramFile>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramFile {
    pub file_id: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_path: Option<String>,
}
