//! Translation orchestrator
//!
//! Owns the interaction state machine behind the translation panel. The
//! orchestrator performs no I/O: every event that needs a translation returns
//! the [`TranslationRequest`] to dispatch, and the caller feeds the eventual
//! [`TranslationResult`] back through [`TranslationOrchestrator::complete`].
//!
//! Only the most recently dispatched request is current. Results carrying any
//! other id are dropped without touching the panel, which is how a slow
//! response is superseded by a newer selection or language change.
//!
//! # Example
//!
//! ```
//! use novel_reader::{PanelStatus, Selection, TranslationOrchestrator, TranslationResult};
//!
//! let mut orchestrator = TranslationOrchestrator::new("French");
//! let request = orchestrator.select(Selection::new("Hello").unwrap());
//! assert_eq!(orchestrator.panel().status, PanelStatus::Loading);
//!
//! orchestrator.complete(TranslationResult::success(request.id, "Bonjour"));
//! assert_eq!(orchestrator.panel().status, PanelStatus::Success("Bonjour".into()));
//! ```

use crate::panel::{PanelState, PanelStatus};
use crate::request::{RequestId, TranslationOutcome, TranslationRequest, TranslationResult};
use crate::selection::{Selection, SelectionSurface};
use tracing::{debug, info};

/// State of the translation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderState {
    Closed,
    Loading {
        selection: Selection,
        language: String,
    },
    Shown {
        selection: Selection,
        language: String,
        text: String,
    },
    Errored {
        selection: Selection,
        language: String,
        message: String,
    },
}

impl ReaderState {
    pub fn is_closed(&self) -> bool {
        matches!(self, ReaderState::Closed)
    }

    /// The active selection, if the panel is open.
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            ReaderState::Closed => None,
            ReaderState::Loading { selection, .. }
            | ReaderState::Shown { selection, .. }
            | ReaderState::Errored { selection, .. } => Some(selection),
        }
    }

    /// The language the open panel is bound to.
    pub fn language(&self) -> Option<&str> {
        match self {
            ReaderState::Closed => None,
            ReaderState::Loading { language, .. }
            | ReaderState::Shown { language, .. }
            | ReaderState::Errored { language, .. } => Some(language),
        }
    }
}

/// Inputs to the state machine, in the order the reader produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    Selected(Selection),
    LanguageChanged(String),
    Close,
    Completed(TranslationResult),
}

#[derive(Debug)]
pub struct TranslationOrchestrator {
    state: ReaderState,
    // Picker value; outlives the panel so the next selection uses it.
    target_language: String,
    current: Option<RequestId>,
    next_id: u64,
}

impl TranslationOrchestrator {
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            state: ReaderState::Closed,
            target_language: target_language.into(),
            current: None,
            next_id: 0,
        }
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Id of the request whose result will be accepted, if any is in flight.
    pub fn current_request(&self) -> Option<RequestId> {
        self.current
    }

    /// Project the state into what the panel renders.
    pub fn panel(&self) -> PanelState {
        let status = match &self.state {
            ReaderState::Closed => PanelStatus::Idle,
            ReaderState::Loading { .. } => PanelStatus::Loading,
            ReaderState::Shown { text, .. } => PanelStatus::Success(text.clone()),
            ReaderState::Errored { message, .. } => PanelStatus::Error(message.clone()),
        };

        PanelState {
            visible: !self.state.is_closed(),
            source_text: self
                .state
                .selection()
                .map(|s| s.text().to_string())
                .unwrap_or_default(),
            target_language: self.target_language.clone(),
            status,
        }
    }

    /// A new selection always restarts the panel at Loading, from any state.
    pub fn select(&mut self, selection: Selection) -> TranslationRequest {
        let language = self.target_language.clone();
        self.dispatch(selection, language)
    }

    /// Switch the target language.
    ///
    /// While a selection is active the same source text is re-dispatched in
    /// the new language, even if the language did not actually change. While
    /// closed the choice is only remembered.
    pub fn change_language(&mut self, language: impl Into<String>) -> Option<TranslationRequest> {
        let language = language.into();
        self.target_language = language.clone();

        let selection = self.state.selection()?.clone();
        Some(self.dispatch(selection, language))
    }

    /// Apply a finished translation. Returns `false` for stale results.
    pub fn complete(&mut self, result: TranslationResult) -> bool {
        if self.current != Some(result.request_id) {
            debug!(request = %result.request_id, "discarding stale translation result");
            return false;
        }
        self.current = None;

        let (selection, language) = match std::mem::replace(&mut self.state, ReaderState::Closed) {
            ReaderState::Loading {
                selection,
                language,
            } => (selection, language),
            // The current id is retired on every transition out of Loading,
            // so a matching result always finds the panel loading.
            other => {
                self.state = other;
                return false;
            }
        };

        self.state = match result.outcome {
            TranslationOutcome::Success(text) => ReaderState::Shown {
                selection,
                language,
                text,
            },
            TranslationOutcome::Failure(message) => ReaderState::Errored {
                selection,
                language,
                message,
            },
        };
        true
    }

    /// Dismiss the panel and clear the native selection so a stale
    /// highlight cannot reopen it.
    pub fn close<S>(&mut self, surface: &mut S)
    where
        S: SelectionSurface + ?Sized,
    {
        if self.state.is_closed() {
            return;
        }
        self.state = ReaderState::Closed;
        self.current = None;
        surface.clear_selection();
    }

    /// Feed one event through the state machine.
    pub fn handle<S>(&mut self, event: ReaderEvent, surface: &mut S) -> Option<TranslationRequest>
    where
        S: SelectionSurface + ?Sized,
    {
        match event {
            ReaderEvent::Selected(selection) => Some(self.select(selection)),
            ReaderEvent::LanguageChanged(language) => self.change_language(language),
            ReaderEvent::Close => {
                self.close(surface);
                None
            }
            ReaderEvent::Completed(result) => {
                self.complete(result);
                None
            }
        }
    }

    fn dispatch(&mut self, selection: Selection, language: String) -> TranslationRequest {
        self.next_id += 1;
        let id = RequestId::new(self.next_id);

        let request = TranslationRequest {
            id,
            source_text: selection.text().to_string(),
            target_language: language.clone(),
        };
        info!(request = %id, language = %language, "dispatching translation");

        self.current = Some(id);
        self.state = ReaderState::Loading {
            selection,
            language,
        };
        request
    }
}
