//! Pipeline stages for relaying one update.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the dispatcher reads as a straight sequence of calls.
//!
//! ## Data Flow
//!
//! ```text
//! photo:     resolve ─────────────────────────────▶ vision ──▶ notify
//!            (getFile)                               (URL)
//!
//! document:  resolve ──▶ download ──▶ render ──▶ encode ──▶ vision ──▶ notify
//!            (getFile)    (bytes)     (pdfium)   (PNG)     (data URI)
//! ```
//!
//! 1. [`resolve`]: file handle → download URL; URL → bytes
//! 2. [`render`]: first PDF page → PNG, on the blocking pool
//! 3. [`encode`]: PNG encoding and `data:` URIs
//! 4. [`vision`]: the chat-completion call; the only stage talking to the model
//! 5. [`notify`]: `sendMessage` / `sendPhoto`

pub mod encode;
pub mod notify;
pub mod render;
pub mod resolve;
pub mod vision;
