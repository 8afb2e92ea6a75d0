//! Document view
//!
//! Rendering and pagination belong to the document-rendering collaborator.
//! This module keeps the small amount of view state the reader drives it
//! with: page count reported on load, the current page and the zoom factor.

use crate::error::{ReaderError, ReaderResult};
use serde::Serialize;

/// The only document type the reader accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file the reader agreed to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenedDocument {
    pub name: String,
}

/// Check an uploaded file against the accepted MIME type.
///
/// Rejection happens before any reader state is touched.
pub fn accept_document(name: &str, mime_type: &str) -> ReaderResult<OpenedDocument> {
    if mime_type.trim().eq_ignore_ascii_case(PDF_MIME_TYPE) {
        Ok(OpenedDocument {
            name: name.to_string(),
        })
    } else {
        Err(ReaderError::UnsupportedFile {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    num_pages: u32,
    current_page: u32,
    // Stored in tenths so repeated steps never drift.
    zoom_tenths: u32,
    loading: bool,
}

impl DocumentView {
    pub const MIN_ZOOM_TENTHS: u32 = 5;
    pub const MAX_ZOOM_TENTHS: u32 = 20;

    pub fn new() -> Self {
        Self {
            num_pages: 0,
            current_page: 1,
            zoom_tenths: 10,
            loading: true,
        }
    }

    /// "Document ready" callback from the renderer.
    pub fn on_loaded(&mut self, num_pages: u32) {
        self.num_pages = num_pages;
        self.current_page = 1;
        self.loading = false;
    }

    /// A different file was opened: back to page one, waiting for load.
    pub fn reset(&mut self) {
        self.current_page = 1;
        self.loading = true;
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn zoom(&self) -> f32 {
        self.zoom_tenths as f32 / 10.0
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom_tenths * 10
    }

    /// Jump to page `n`, clamped to `[1, num_pages]`.
    pub fn set_current_page(&mut self, n: i64) -> u32 {
        let last = i64::from(self.num_pages.max(1));
        self.current_page = n.clamp(1, last) as u32;
        self.current_page
    }

    pub fn change_page(&mut self, offset: i64) -> u32 {
        self.set_current_page(i64::from(self.current_page) + offset)
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.current_page < self.num_pages
    }

    /// Set the zoom factor, snapped to 0.1 steps within `[0.5, 2.0]`.
    pub fn set_zoom(&mut self, factor: f32) -> f32 {
        let tenths = if factor.is_finite() {
            (factor * 10.0).round().max(0.0) as u32
        } else {
            10
        };
        self.zoom_tenths = tenths.clamp(Self::MIN_ZOOM_TENTHS, Self::MAX_ZOOM_TENTHS);
        self.zoom()
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.zoom_tenths = (self.zoom_tenths + 1).min(Self::MAX_ZOOM_TENTHS);
        self.zoom()
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.zoom_tenths = self.zoom_tenths.saturating_sub(1).max(Self::MIN_ZOOM_TENTHS);
        self.zoom()
    }
}

impl Default for DocumentView {
    fn default() -> Self {
        Self::new()
    }
}
