//! Fixed text sent back to the chat.
//!
//! Error details never reach users; every failure collapses into one of the
//! [`FailureNotice`] strings below.

/// Caption on the rasterised page that precedes a PDF reply.
pub const RENDERED_PAGE_CAPTION: &str = "Converted PDF page to image";

/// Reply for a successful photo extraction.
pub fn photo_reply(extracted: &str) -> String {
    format!("🔍 **Extracted text from image:**\n\n{extracted}")
}

/// Reply for a successful PDF extraction.
pub fn document_reply(extracted: &str) -> String {
    format!("📄 **Extracted text from PDF:**\n\n{extracted}")
}

/// User-facing failure messages, one per (flow, failing stage) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureNotice {
    PhotoDownload,
    PhotoExtraction,
    DocumentDownload,
    DocumentContent,
    DocumentExtraction,
}

impl FailureNotice {
    pub fn text(self) -> &'static str {
        match self {
            FailureNotice::PhotoDownload => {
                "Sorry, I couldn't download the image. Please try again."
            }
            FailureNotice::PhotoExtraction => {
                "Sorry, I couldn't extract any text from this image. Please try with a clearer image."
            }
            FailureNotice::DocumentDownload => {
                "Sorry, I couldn't download the PDF. Please try again."
            }
            FailureNotice::DocumentContent => {
                "Sorry, I couldn't download the PDF content. Please try again."
            }
            FailureNotice::DocumentExtraction => {
                "Sorry, I couldn't extract any text from this PDF. Please try with a different document."
            }
        }
    }
}
