//! Reader session event loop
//!
//! Couples a [`TranslationOrchestrator`] with a [`ModelFallbackClient`]. A
//! single task owns the orchestrator; reader commands and translation
//! results reach it through one channel and are applied strictly in arrival
//! order. Each dispatched request runs as its own task and posts its result
//! back into that channel, where the orchestrator drops it if it has been
//! superseded meanwhile.
//!
//! Every command is acknowledged with the panel as it stood right after the
//! command was applied, so a Loading or Closed panel is observable before any
//! network call resolves.

use crate::error::SessionError;
use crate::fallback::ModelFallbackClient;
use novel_reader::{
    MemorySelection, PanelState, SelectionCapture, TranslationOrchestrator, TranslationRequest,
    TranslationResult,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Selection gesture released; carries the surface's current selection.
    Release(String),
    ChangeLanguage(String),
    Close,
}

enum Message {
    Command(SessionCommand, oneshot::Sender<PanelState>),
    Completed(TranslationResult),
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Message>,
    panel: watch::Receiver<PanelState>,
}

impl SessionHandle {
    /// Start a session on the current tokio runtime.
    pub fn spawn(client: ModelFallbackClient, target_language: impl Into<String>) -> Self {
        let orchestrator = TranslationOrchestrator::new(target_language);
        let (panel_tx, panel_rx) = watch::channel(orchestrator.panel());
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = SessionWorker {
            orchestrator,
            capture: SelectionCapture::new(),
            surface: MemorySelection::new(),
            client,
            panel: panel_tx,
            results: tx.downgrade(),
        };
        tokio::spawn(worker.run(rx));

        Self {
            commands: tx,
            panel: panel_rx,
        }
    }

    pub async fn send(&self, command: SessionCommand) -> Result<PanelState, SessionError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Message::Command(command, ack_tx))
            .map_err(|_| SessionError::Stopped)?;
        ack_rx.await.map_err(|_| SessionError::Stopped)
    }

    pub async fn release(&self, selection: impl Into<String>) -> Result<PanelState, SessionError> {
        self.send(SessionCommand::Release(selection.into())).await
    }

    pub async fn change_language(
        &self,
        language: impl Into<String>,
    ) -> Result<PanelState, SessionError> {
        self.send(SessionCommand::ChangeLanguage(language.into())).await
    }

    pub async fn close(&self) -> Result<PanelState, SessionError> {
        self.send(SessionCommand::Close).await
    }

    /// Latest published panel.
    pub fn panel(&self) -> PanelState {
        self.panel.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.panel.clone()
    }

    /// Wait until the panel is no longer loading.
    pub async fn settled(&self) -> Result<PanelState, SessionError> {
        let mut rx = self.panel.clone();
        let panel = rx
            .wait_for(|panel| !panel.status.is_loading())
            .await
            .map_err(|_| SessionError::Stopped)?;
        Ok((*panel).clone())
    }
}

struct SessionWorker {
    orchestrator: TranslationOrchestrator,
    capture: SelectionCapture,
    surface: MemorySelection,
    client: ModelFallbackClient,
    panel: watch::Sender<PanelState>,
    // Weak so the loop ends once every handle is dropped.
    results: mpsc::WeakUnboundedSender<Message>,
}

impl SessionWorker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Message>) {
        while let Some(message) = rx.recv().await {
            match message {
                Message::Command(command, ack) => {
                    if let Some(request) = self.apply(command) {
                        self.dispatch(request);
                    }
                    let panel = self.publish();
                    // The caller may have stopped waiting.
                    let _ = ack.send(panel);
                }
                Message::Completed(result) => {
                    if self.orchestrator.complete(result) {
                        self.publish();
                    }
                }
            }
        }
        debug!("reader session stopped");
    }

    fn apply(&mut self, command: SessionCommand) -> Option<TranslationRequest> {
        match command {
            SessionCommand::Release(raw) => {
                self.surface.select(raw);
                let selection = self.capture.on_release(&self.surface)?;
                Some(self.orchestrator.select(selection))
            }
            SessionCommand::ChangeLanguage(language) => self.orchestrator.change_language(language),
            SessionCommand::Close => {
                self.orchestrator.close(&mut self.surface);
                None
            }
        }
    }

    fn dispatch(&self, request: TranslationRequest) {
        let client = self.client.clone();
        let results = self.results.clone();
        tokio::spawn(async move {
            let result = client.execute(&request).await;
            if let Some(tx) = results.upgrade() {
                let _ = tx.send(Message::Completed(result));
            }
        });
    }

    fn publish(&self) -> PanelState {
        let panel = self.orchestrator.panel();
        self.panel.send_replace(panel.clone());
        panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::error::BackendError;
    use crate::mock::{MockBackend, MockMode, MockReply};
    use novel_reader::{PanelStatus, SelectionSurface};
    use std::sync::Arc;
    use std::time::Duration;

    fn session(
        primary: Arc<MockBackend>,
        secondary: Arc<MockBackend>,
        language: &str,
    ) -> SessionHandle {
        let client = ModelFallbackClient::with_backends(
            &TranslatorConfig::new("test-key"),
            primary,
            secondary,
        );
        SessionHandle::spawn(client, language)
    }

    #[tokio::test]
    async fn test_release_acknowledges_loading() {
        let primary = Arc::new(MockBackend::new(MockMode::Fixed(
            MockReply::text("Hola").after(50),
        )));
        let handle = session(primary, Arc::new(MockBackend::empty()), "Spanish");

        let panel = handle.release("Hello").await.unwrap();
        assert!(panel.visible);
        assert_eq!(panel.source_text, "Hello");
        assert_eq!(panel.status, PanelStatus::Loading);

        let panel = handle.settled().await.unwrap();
        assert_eq!(panel.status, PanelStatus::Success("Hola".to_string()));
    }

    #[tokio::test]
    async fn test_whitespace_release_keeps_panel_closed() {
        let primary = Arc::new(MockBackend::fixed("Hola"));
        let handle = session(primary.clone(), Arc::new(MockBackend::empty()), "Spanish");

        let panel = handle.release("   \n").await.unwrap();
        assert!(!panel.visible);
        assert_eq!(panel.status, PanelStatus::Idle);
        assert_eq!(primary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_first_selection_is_superseded() {
        let primary = Arc::new(MockBackend::mappings([
            ("first passage", MockReply::text("premier").after(150)),
            ("second passage", MockReply::text("second").after(10)),
        ]));
        let handle = session(primary.clone(), Arc::new(MockBackend::empty()), "French");

        handle.release("first passage").await.unwrap();
        let panel = handle.release("second passage").await.unwrap();
        assert_eq!(panel.status, PanelStatus::Loading);

        let panel = handle.settled().await.unwrap();
        assert_eq!(panel.source_text, "second passage");
        assert_eq!(panel.status, PanelStatus::Success("second".to_string()));

        // Let the slow request finish its round trip; it must be dropped.
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(primary.call_count(), 2);
        assert_eq!(handle.panel().status, PanelStatus::Success("second".to_string()));
    }

    #[tokio::test]
    async fn test_fallback_scenario_shows_secondary_text() {
        let primary = Arc::new(MockBackend::failing(BackendError::Quota(
            "RESOURCE_EXHAUSTED: Quota exceeded".to_string(),
        )));
        let secondary = Arc::new(MockBackend::fixed("Bonjour"));
        let handle = session(primary, secondary, "French");

        handle.release("Hello").await.unwrap();
        let panel = handle.settled().await.unwrap();
        assert_eq!(panel.status, PanelStatus::Success("Bonjour".to_string()));
    }

    #[tokio::test]
    async fn test_total_failure_shows_secondary_error() {
        let primary = Arc::new(MockBackend::failing(BackendError::Quota(
            "primary quota".to_string(),
        )));
        let secondary = Arc::new(MockBackend::failing(BackendError::Access(
            "secondary access denied".to_string(),
        )));
        let handle = session(primary, secondary, "French");

        handle.release("Hello").await.unwrap();
        let panel = handle.settled().await.unwrap();
        assert_eq!(
            panel.status,
            PanelStatus::Error("secondary access denied".to_string())
        );
    }

    #[tokio::test]
    async fn test_language_round_trip_redispatches() {
        let primary = Arc::new(MockBackend::mappings([
            ("into French", MockReply::text("Bonjour")),
            ("into German", MockReply::text("Hallo")),
        ]));
        let handle = session(primary.clone(), Arc::new(MockBackend::empty()), "French");

        handle.release("Hello").await.unwrap();
        assert_eq!(
            handle.settled().await.unwrap().status,
            PanelStatus::Success("Bonjour".to_string())
        );

        let panel = handle.change_language("German").await.unwrap();
        assert_eq!(panel.status, PanelStatus::Loading);
        assert_eq!(panel.source_text, "Hello");
        assert_eq!(
            handle.settled().await.unwrap().status,
            PanelStatus::Success("Hallo".to_string())
        );

        handle.change_language("French").await.unwrap();
        let panel = handle.settled().await.unwrap();
        assert_eq!(panel.status, PanelStatus::Success("Bonjour".to_string()));
        assert_eq!(panel.target_language, "French");
        assert_eq!(primary.call_count(), 3);
    }

    #[tokio::test]
    async fn test_close_clears_panel_and_drops_late_result() {
        let primary = Arc::new(MockBackend::new(MockMode::Fixed(
            MockReply::text("Hola").after(50),
        )));
        let handle = session(primary.clone(), Arc::new(MockBackend::empty()), "Spanish");

        handle.release("Hello").await.unwrap();
        let panel = handle.close().await.unwrap();
        assert!(!panel.visible);
        assert_eq!(panel.source_text, "");
        assert_eq!(panel.status, PanelStatus::Idle);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(primary.call_count(), 1);
        assert!(!handle.panel().visible);
    }

    #[tokio::test]
    async fn test_language_change_while_closed_is_noop() {
        let primary = Arc::new(MockBackend::fixed("Hola"));
        let handle = session(primary.clone(), Arc::new(MockBackend::empty()), "French");

        let panel = handle.change_language("Spanish").await.unwrap();
        assert!(!panel.visible);
        assert_eq!(primary.call_count(), 0);

        handle.release("Hello").await.unwrap();
        handle.settled().await.unwrap();
        assert!(primary.prompts()[0].contains("into Spanish"));
    }

    #[tokio::test]
    async fn test_missing_credentials_surface_in_panel() {
        let primary = Arc::new(MockBackend::fixed("Hola"));
        let secondary = Arc::new(MockBackend::fixed("Hola"));
        let client = ModelFallbackClient::with_backends(
            &TranslatorConfig::without_credentials(),
            primary.clone(),
            secondary.clone(),
        );
        let handle = SessionHandle::spawn(client, "Spanish");

        handle.release("Hello").await.unwrap();
        let panel = handle.settled().await.unwrap();
        assert_eq!(panel.status, PanelStatus::Error("missing credentials".to_string()));
        assert_eq!(primary.call_count() + secondary.call_count(), 0);
    }

    #[test]
    fn test_worker_close_clears_reported_selection() {
        let (panel, _panel_rx) = watch::channel(PanelState::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut worker = SessionWorker {
            orchestrator: TranslationOrchestrator::new("French"),
            capture: SelectionCapture::new(),
            surface: MemorySelection::new(),
            client: ModelFallbackClient::with_backends(
                &TranslatorConfig::without_credentials(),
                Arc::new(MockBackend::empty()),
                Arc::new(MockBackend::empty()),
            ),
            panel,
            results: tx.downgrade(),
        };

        assert!(worker.apply(SessionCommand::Release("Hello".to_string())).is_some());
        assert_eq!(worker.surface.current_selection().as_deref(), Some("Hello"));

        assert!(worker.apply(SessionCommand::Close).is_none());
        assert!(worker.surface.current_selection().is_none());
        assert_eq!(worker.surface.clear_count(), 1);
    }
}
