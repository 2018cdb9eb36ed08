//! PDF rasterisation: render the first page of a document to PNG via pdfium.
//!
//! ## Rasterizer seam
//!
//! The dispatcher depends on [`PageRasterizer`], not on pdfium. The server
//! runs [`PdfiumRasterizer`]; tests plug in a recording fake, so pdfium does
//! not have to be installed to exercise the document flow.
//!
//! ## Blocking pool
//!
//! pdfium is CPU-bound and synchronous. [`rasterize_first_page`] runs it
//! through `spawn_blocking` so tokio worker threads keep serving webhooks.
//!
//! ## Pixel cap
//!
//! Pages are scaled so the longest edge is at most `max_rendered_pixels`,
//! independent of the page's physical size.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::pipeline::encode;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// The only page the relay ever renders.
pub const FIRST_PAGE: u16 = 0;

/// An encoded page image, owned by the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
}

/// Renders one page of a paginated document to a PNG.
pub trait PageRasterizer: Send + Sync {
    /// Render `page` (0-based) of `document`.
    ///
    /// # Errors
    /// [`RelayError::DocumentOpen`] if the bytes are not a document,
    /// [`RelayError::EmptyDocument`] if it has no pages,
    /// [`RelayError::Render`] / [`RelayError::Encode`] on later failures.
    fn render_page(&self, document: &[u8], page: u16) -> Result<RasterImage, RelayError>;
}

/// Render [`FIRST_PAGE`] of `document` on the blocking pool.
///
/// Later pages are never looked at; a 300-page PDF costs the same as a
/// one-page one.
pub async fn rasterize_first_page(
    rasterizer: Arc<dyn PageRasterizer>,
    document: Vec<u8>,
) -> Result<RasterImage, RelayError> {
    tokio::task::spawn_blocking(move || rasterizer.render_page(&document, FIRST_PAGE))
        .await
        .map_err(|e| RelayError::Internal(format!("Render task panicked: {}", e)))?
}

/// [`PageRasterizer`] backed by pdfium.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    lib_path: Option<String>,
    max_pixels: u32,
}

impl PdfiumRasterizer {
    pub fn new(lib_path: Option<String>, max_pixels: u32) -> Self {
        Self {
            lib_path,
            max_pixels,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.pdfium_lib_path.clone(), config.max_rendered_pixels)
    }

    /// Bind and release pdfium once, so a missing library shows up at
    /// startup rather than on the first PDF.
    ///
    /// # Errors
    /// [`RelayError::PdfiumUnavailable`] if the library cannot be bound.
    pub fn check_available(&self) -> Result<(), RelayError> {
        self.bind().map(drop)
    }

    fn bind(&self) -> Result<Pdfium, RelayError> {
        let bindings = match &self.lib_path {
            Some(path) => Pdfium::bind_to_library(path),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| RelayError::PdfiumUnavailable(format!("{:?}", e)))?;
        Ok(Pdfium::new(bindings))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn render_page(&self, document: &[u8], page: u16) -> Result<RasterImage, RelayError> {
        let pdfium = self.bind()?;

        let doc = pdfium
            .load_pdf_from_byte_slice(document, None)
            .map_err(|e| RelayError::DocumentOpen {
                detail: format!("{:?}", e),
            })?;

        let pages = doc.pages();
        let total = pages.len();
        if total == 0 {
            return Err(RelayError::EmptyDocument);
        }
        info!("PDF loaded: {} pages, rendering page {}", total, page + 1);

        let pdf_page = pages.get(page).map_err(|e| RelayError::Render {
            page,
            detail: format!("{:?}", e),
        })?;

        let edge = i32::try_from(self.max_pixels).map_err(|_| RelayError::Render {
            page,
            detail: format!("pixel cap {} out of range", self.max_pixels),
        })?;
        let render_config = PdfRenderConfig::new()
            .set_target_width(edge)
            .set_maximum_height(edge);

        let bitmap = pdf_page
            .render_with_config(&render_config)
            .map_err(|e| RelayError::Render {
                page,
                detail: format!("{:?}", e),
            })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page + 1,
            image.width(),
            image.height()
        );

        let png = encode::encode_png(&image)?;
        Ok(RasterImage { png })
    }
}
