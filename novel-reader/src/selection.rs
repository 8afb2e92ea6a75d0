//! Selection capture
//!
//! The reading surface owns the native text selection. [`SelectionCapture`]
//! only reads it when a release signal arrives and forwards non-empty
//! selections upward as [`Selection`] events.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A passage highlighted by the reader.
///
/// The text is kept exactly as selected (untrimmed); it is guaranteed to
/// contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    text: String,
}

impl Selection {
    /// Wrap raw selected text, rejecting whitespace-only input.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            text: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        Selection::new(raw.text).ok_or_else(|| de::Error::custom("selection contains no text"))
    }
}

/// The ambient text-selection mechanism of the display surface.
pub trait SelectionSurface {
    /// The current native selection, if any.
    fn current_selection(&self) -> Option<String>;

    /// Remove any active highlight from the surface.
    fn clear_selection(&mut self);
}

/// Reads the surface on release signals and emits non-empty selections.
#[derive(Debug, Default)]
pub struct SelectionCapture {
    last_raw: Option<String>,
}

impl SelectionCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one selection-release signal.
    ///
    /// Returns `Some` only when the surface holds a selection with non-empty
    /// trimmed content. The surface itself is never modified.
    pub fn on_release<S>(&mut self, surface: &S) -> Option<Selection>
    where
        S: SelectionSurface + ?Sized,
    {
        let raw = surface.current_selection();
        self.last_raw = raw.clone();
        Selection::new(raw?)
    }

    /// The raw string read on the most recent release, empty or not.
    pub fn last_raw(&self) -> Option<&str> {
        self.last_raw.as_deref()
    }
}

/// In-memory selection surface.
///
/// Used where the real selection lives in a remote client (the web surface
/// reports it with each release) and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySelection {
    current: Option<String>,
    clears: usize,
}

impl MemorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active selection, as a user dragging over text would.
    pub fn select(&mut self, text: impl Into<String>) {
        self.current = Some(text.into());
    }

    /// Number of times the surface was asked to clear its selection.
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl SelectionSurface for MemorySelection {
    fn current_selection(&self) -> Option<String> {
        self.current.clone()
    }

    fn clear_selection(&mut self) {
        self.current = None;
        self.clears += 1;
    }
}
