//! # vision-relay
//!
//! A Telegram webhook relay that reads photos and PDFs with a vision
//! language model and posts the extracted text back to the chat.
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST /webhook (Update)
//!  │
//!  ├─ 1. Dispatch  photo? PDF? otherwise acknowledge and stop
//!  ├─ 2. Resolve   getFile → download URL (PDF: fetch the bytes too)
//!  ├─ 3. Render    PDF only: first page → PNG via pdfium (spawn_blocking)
//!  ├─ 4. Extract   one chat-completion call with the image (URL or data URI)
//!  └─ 5. Notify    sendMessage (PDF: sendPhoto with the rendered page first)
//! ```
//!
//! Every step runs once, in order, inside the request that received the
//! update. Failures become one of a few fixed chat messages; the webhook
//! itself is always acknowledged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vision_relay::{server, Dispatcher, PdfiumRasterizer, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(
//!         RelayConfig::builder()
//!             .bot_token(std::env::var("TELEGRAM_BOT_TOKEN")?)
//!             .openai_api_key(std::env::var("OPENAI_API_KEY")?)
//!             .build()?,
//!     );
//!     let rasterizer = Arc::new(PdfiumRasterizer::from_config(&config));
//!     server::serve(Dispatcher::new(config, rasterizer)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `vision-relay` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod replies;
pub mod server;
pub mod telegram;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RelayConfig, RelayConfigBuilder};
pub use dispatch::{DispatchOutcome, Dispatcher, Flow};
pub use error::{RelayError, Stage};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer, RasterImage};
pub use pipeline::vision::{ImageSource, VisionExtractor};
pub use prompts::PromptStyle;
pub use replies::FailureNotice;
pub use telegram::{TelegramClient, Update};
