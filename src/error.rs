//! Error types for the vision relay.
//!
//! Every stage of the pipeline returns [`RelayError`]. None of these errors
//! ever reaches a chat user verbatim: the dispatcher classifies each one with
//! [`RelayError::stage`] and swaps it for a fixed notice from
//! [`crate::replies`]. The only variant surfaced to an HTTP caller is
//! [`RelayError::MalformedRequest`], which becomes a `400`.

use thiserror::Error;

/// All errors produced while relaying one update.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── File errors ───────────────────────────────────────────────────────
    /// The file-metadata lookup failed, returned garbage, or reported `ok: false`.
    #[error("Could not resolve file '{file_id}': {reason}")]
    Resolution { file_id: String, reason: String },

    /// Fetching the raw bytes behind a resolved file URL failed.
    #[error("Failed to download file: {reason}")]
    Download { reason: String },

    // ── Rasterisation errors ──────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error("Failed to bind to pdfium library: {0}\nSet PDFIUM_LIB_PATH=/path/to/libpdfium.")]
    PdfiumUnavailable(String),

    /// The bytes are not a document pdfium can open.
    #[error("Could not open document: {detail}")]
    DocumentOpen { detail: String },

    /// The document opened but has no pages.
    #[error("Document has no pages")]
    EmptyDocument,

    /// pdfium failed to render the requested page.
    #[error("Rendering failed for page {page}: {detail}")]
    Render { page: u16, detail: String },

    /// The rendered bitmap could not be encoded as PNG.
    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    // ── Provider errors ───────────────────────────────────────────────────
    /// The completion request never produced a response.
    #[error("Vision provider request failed: {0}")]
    ProviderHttp(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Vision provider returned HTTP {status}: {body}")]
    ProviderResponse { status: u16, body: String },

    /// The provider body did not match the chat-completion shape.
    #[error("Could not parse vision provider response: {0}")]
    ProviderParse(#[source] serde_json::Error),

    /// The provider response decoded but carried zero choices.
    #[error("Vision provider returned no choices")]
    NoChoices,

    // ── Outbound messaging ────────────────────────────────────────────────
    /// Posting a message or photo back to the chat failed.
    #[error("Failed to notify chat {chat_id}: {reason}")]
    Notify { chat_id: i64, reason: String },

    // ── Inbound ───────────────────────────────────────────────────────────
    /// The webhook body is not a valid update.
    #[error("Malformed request body: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    // ── Setup / internal ──────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A blocking task panicked or was cancelled.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline stage an error originated from.
///
/// The dispatcher picks the user-facing notice from `(flow, stage)` alone, so
/// adding a new error variant only requires classifying it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Download,
    Rasterize,
    Extract,
    Notify,
    Request,
    Setup,
}

impl RelayError {
    /// Classify the error by the stage that produced it.
    pub fn stage(&self) -> Stage {
        match self {
            RelayError::Resolution { .. } => Stage::Resolve,
            RelayError::Download { .. } => Stage::Download,
            RelayError::PdfiumUnavailable(_)
            | RelayError::DocumentOpen { .. }
            | RelayError::EmptyDocument
            | RelayError::Render { .. }
            | RelayError::Encode(_) => Stage::Rasterize,
            RelayError::ProviderHttp(_)
            | RelayError::ProviderResponse { .. }
            | RelayError::ProviderParse(_)
            | RelayError::NoChoices => Stage::Extract,
            RelayError::Notify { .. } => Stage::Notify,
            RelayError::MalformedRequest(_) => Stage::Request,
            RelayError::InvalidConfig(_) | RelayError::Internal(_) => Stage::Setup,
        }
    }

    pub(crate) fn resolution(file_id: &str, reason: impl Into<String>) -> Self {
        RelayError::Resolution {
            file_id: file_id.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_response_display() {
        let e = RelayError::ProviderResponse {
            status: 500,
            body: "upstream exploded".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("500"), "got: {msg}");
        assert!(msg.contains("upstream exploded"));
    }

    #[test]
    fn resolution_display_names_file() {
        let e = RelayError::resolution("AgAD123", "ok=false");
        assert!(e.to_string().contains("AgAD123"));
    }

    #[test]
    fn rasterisation_errors_share_a_stage() {
        for e in [
            RelayError::DocumentOpen { detail: "x".into() },
            RelayError::EmptyDocument,
            RelayError::Render {
                page: 0,
                detail: "x".into(),
            },
            RelayError::PdfiumUnavailable("missing".into()),
        ] {
            assert_eq!(e.stage(), Stage::Rasterize, "{e}");
        }
    }

    #[test]
    fn provider_errors_classify_as_extract() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(RelayError::ProviderParse(parse).stage(), Stage::Extract);
        assert_eq!(RelayError::NoChoices.stage(), Stage::Extract);
        assert_eq!(
            RelayError::ProviderResponse {
                status: 401,
                body: String::new()
            }
            .stage(),
            Stage::Extract
        );
    }

    #[test]
    fn malformed_request_is_request_stage() {
        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(RelayError::MalformedRequest(parse).stage(), Stage::Request);
    }
}
