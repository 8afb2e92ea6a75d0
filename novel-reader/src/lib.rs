//! Reader core: selection capture and the translation panel state machine.
//!
//! The pieces compose top-down:
//!
//! 1. [`SelectionCapture`] turns release signals from the reading surface into
//!    [`Selection`] events, ignoring whitespace-only highlights.
//! 2. [`TranslationOrchestrator`] turns selections and language changes into
//!    [`TranslationRequest`]s, accepts only the result of the current request,
//!    and projects everything into a [`PanelState`].
//!
//! Issuing the actual translation is left to the caller (see the
//! `novel-reader-mt` crate), so the state machine stays synchronous.

pub mod document;
pub mod error;
pub mod languages;
pub mod orchestrator;
pub mod panel;
pub mod request;
pub mod selection;

pub use document::{DocumentView, OpenedDocument, PDF_MIME_TYPE, accept_document};
pub use error::{ReaderError, ReaderResult, UNSUPPORTED_FILE_MESSAGE};
pub use languages::{DEFAULT_LANGUAGE, LANGUAGES, Language};
pub use orchestrator::{ReaderEvent, ReaderState, TranslationOrchestrator};
pub use panel::{PanelState, PanelStatus};
pub use request::{RequestId, TranslationOutcome, TranslationRequest, TranslationResult};
pub use selection::{MemorySelection, Selection, SelectionCapture, SelectionSurface};
