//! Update dispatch: decide what an update needs and run the matching flow.
//!
//! ## Error contract
//!
//! [`Dispatcher::handle_update`] never fails. Each flow is written as a plain
//! `Result` chain with `?`; the single handler at the end of
//! `handle_update` logs the error, maps `(flow, stage)` to a
//! [`FailureNotice`], and sends that fixed string to the chat. If even that
//! notification fails, the failure is logged and dropped. Webhook callers
//! always get their acknowledgment, so Telegram never redelivers an update.

use crate::config::RelayConfig;
use crate::error::{RelayError, Stage};
use crate::pipeline::encode::PNG_MIME_TYPE;
use crate::pipeline::render::{self, PageRasterizer, RasterImage};
use crate::pipeline::vision::{ImageSource, VisionExtractor};
use crate::pipeline::{notify, resolve};
use crate::prompts::PromptStyle;
use crate::replies::{self, FailureNotice};
use crate::telegram::{Attachment, Document, PhotoSize, TelegramClient, Update};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Which flow an update was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Photo,
    Document,
}

/// What happened to one update. Returned for logging and tests; the webhook
/// acknowledges every outcome the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No photo and no PDF; nothing was sent.
    Ignored,
    /// Extraction succeeded and the reply was attempted.
    Replied(Flow),
    /// A stage failed and the notice was attempted.
    Failed(Flow, FailureNotice),
}

/// Pick the user-facing notice for a failed flow.
pub fn failure_notice(flow: Flow, err: &RelayError) -> FailureNotice {
    match (flow, err.stage()) {
        (Flow::Photo, Stage::Resolve) => FailureNotice::PhotoDownload,
        (Flow::Photo, _) => FailureNotice::PhotoExtraction,
        (Flow::Document, Stage::Resolve) => FailureNotice::DocumentDownload,
        (Flow::Document, Stage::Download) => FailureNotice::DocumentContent,
        (Flow::Document, _) => FailureNotice::DocumentExtraction,
    }
}

/// Sequences resolve → (render) → vision → notify for each update.
///
/// Cheap to clone; every field is a handle. Holds no per-request state, so
/// one instance serves all concurrent webhooks.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<RelayConfig>,
    telegram: TelegramClient,
    extractor: VisionExtractor,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl Dispatcher {
    /// Build a dispatcher sharing one HTTP connection pool across the Bot
    /// API and the completion API.
    pub fn new(config: Arc<RelayConfig>, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        let http = reqwest::Client::new();
        Self {
            telegram: TelegramClient::from_config(http.clone(), &config),
            extractor: VisionExtractor::from_config(http, &config),
            config,
            rasterizer,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Handle one inbound update to completion.
    pub async fn handle_update(&self, update: &Update) -> DispatchOutcome {
        let Some(message) = update.message.as_ref() else {
            debug!("Update {} carries no message", update.update_id);
            return DispatchOutcome::Ignored;
        };
        let chat_id = message.chat.id;

        let (flow, result) = match message.attachment() {
            Some(Attachment::Photo(photo)) => {
                info!(chat_id, update_id = update.update_id, file_id = %photo.file_id, "Photo received");
                (Flow::Photo, self.photo_flow(chat_id, photo).await)
            }
            Some(Attachment::Document(doc)) => {
                info!(
                    chat_id,
                    update_id = update.update_id,
                    file_name = doc.file_name.as_deref().unwrap_or(""),
                    "PDF received"
                );
                (Flow::Document, self.document_flow(chat_id, doc).await)
            }
            None => {
                info!(chat_id, update_id = update.update_id, "No photos or PDFs in message");
                return DispatchOutcome::Ignored;
            }
        };

        match result {
            Ok(()) => DispatchOutcome::Replied(flow),
            Err(e) => {
                let notice = failure_notice(flow, &e);
                warn!(chat_id, ?flow, stage = ?e.stage(), error = %e, "Relay failed");
                self.notify_best_effort(chat_id, notice.text()).await;
                DispatchOutcome::Failed(flow, notice)
            }
        }
    }

    async fn photo_flow(&self, chat_id: i64, photo: &PhotoSize) -> Result<(), RelayError> {
        let url = resolve::resolve_file_url(&self.telegram, &photo.file_id).await?;
        let text = self
            .extractor
            .extract(&ImageSource::Url(url), self.config.photo_prompt)
            .await?;

        self.notify_best_effort(chat_id, &replies::photo_reply(&text)).await;
        Ok(())
    }

    async fn document_flow(&self, chat_id: i64, doc: &Document) -> Result<(), RelayError> {
        let url = resolve::resolve_file_url(&self.telegram, &doc.file_id).await?;
        let bytes = resolve::download_file(&self.telegram, &url).await?;

        let RasterImage { png } =
            render::rasterize_first_page(Arc::clone(&self.rasterizer), bytes).await?;

        let courtesy_copy = self.config.send_rendered_page.then(|| png.clone());
        let text = self
            .extractor
            .extract(&ImageSource::inline(PNG_MIME_TYPE, png), PromptStyle::DocumentSummary)
            .await?;

        if let Some(png) = courtesy_copy {
            if let Err(e) =
                notify::send_photo(&self.telegram, chat_id, png, Some(replies::RENDERED_PAGE_CAPTION)).await
            {
                warn!(chat_id, error = %e, "Error sending rendered page");
            }
        }

        self.notify_best_effort(chat_id, &replies::document_reply(&text)).await;
        Ok(())
    }

    /// Read an uploaded image with [`RelayConfig::upload_prompt`].
    ///
    /// Used by the `/upload` endpoint; the caller has already checked the
    /// content type.
    pub async fn extract_upload(&self, mime_type: &str, bytes: Vec<u8>) -> Result<String, RelayError> {
        self.extractor
            .extract(&ImageSource::inline(mime_type, bytes), self.config.upload_prompt)
            .await
    }

    /// Mirror an upload result to the configured chat, if there is one.
    pub async fn relay_upload_result(&self, text: &str) {
        if let Some(chat_id) = self.config.chat_id {
            self.notify_best_effort(chat_id, &replies::photo_reply(text)).await;
        }
    }

    async fn notify_best_effort(&self, chat_id: i64, text: &str) {
        if let Err(e) = notify::send_message(&self.telegram, chat_id, text).await {
            error!(chat_id, error = %e, "Error sending message");
        }
    }
}
