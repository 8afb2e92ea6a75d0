//! Mock text-generation backend for testing
//!
//! A deterministic, network-free [`TextBackend`] that records every prompt it
//! receives, so tests can assert how often (and whether) a backend was hit.
//!
//! # Example
//!
//! ```ignore
//! use novel_reader_mt::{MockBackend, TextBackend};
//!
//! #[tokio::test]
//! async fn test_fixed_reply() {
//!     let mock = MockBackend::fixed("Bonjour");
//!     assert_eq!(mock.generate("any prompt").await.unwrap(), "Bonjour");
//!     assert_eq!(mock.call_count(), 1);
//! }
//! ```

use crate::backend::TextBackend;
use crate::error::BackendError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One canned answer, optionally delayed.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub result: Result<String, BackendError>,
    pub delay_ms: u64,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            result: Ok(text.into()),
            delay_ms: 0,
        }
    }

    pub fn error(err: BackendError) -> Self {
        Self {
            result: Err(err),
            delay_ms: 0,
        }
    }

    pub fn after(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

#[derive(Debug, Clone)]
pub enum MockMode {
    /// Always answer with the same reply
    Fixed(MockReply),

    /// Pick the first reply whose needle occurs in the prompt.
    /// Prompts matching no needle fail with an `InvalidResponse` error.
    Mappings(Vec<(String, MockReply)>),

    /// Return the prompt itself
    Echo,
}

#[derive(Debug)]
pub struct MockBackend {
    name: String,
    mode: MockMode,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(mode: MockMode) -> Self {
        Self {
            name: "mock".to_string(),
            mode,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(MockMode::Fixed(MockReply::text(text)))
    }

    /// A backend that answers successfully with nothing.
    pub fn empty() -> Self {
        Self::fixed("")
    }

    pub fn failing(err: BackendError) -> Self {
        Self::new(MockMode::Fixed(MockReply::error(err)))
    }

    pub fn mappings<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, MockReply)>,
        S: Into<String>,
    {
        Self::new(MockMode::Mappings(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        match &self.mode {
            MockMode::Fixed(reply) => reply.clone(),
            MockMode::Mappings(pairs) => pairs
                .iter()
                .find(|(needle, _)| prompt.contains(needle.as_str()))
                .map(|(_, reply)| reply.clone())
                .unwrap_or_else(|| {
                    MockReply::error(BackendError::InvalidResponse(
                        "no mock reply for prompt".to_string(),
                    ))
                }),
            MockMode::Echo => MockReply::text(prompt),
        }
    }
}

#[async_trait]
impl TextBackend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        let reply = self.reply_for(prompt);
        if reply.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(reply.delay_ms)).await;
        }
        reply.result
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_reply_counts_calls() {
        let mock = MockBackend::fixed("Bonjour");
        assert_eq!(mock.generate("p1").await.unwrap(), "Bonjour");
        assert_eq!(mock.generate("p2").await.unwrap(), "Bonjour");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.prompts(), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_failing_reply() {
        let mock = MockBackend::failing(BackendError::Quota("quota".to_string()));
        assert_eq!(
            mock.generate("p").await,
            Err(BackendError::Quota("quota".to_string()))
        );
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_is_success() {
        let mock = MockBackend::empty();
        assert_eq!(mock.generate("p").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_mappings_match_by_substring() {
        let mock = MockBackend::mappings([
            ("Hello", MockReply::text("Hola")),
            ("Goodbye", MockReply::text("Adiós")),
        ]);
        assert_eq!(mock.generate("say \"Goodbye\"").await.unwrap(), "Adiós");
        assert_eq!(mock.generate("say \"Hello\"").await.unwrap(), "Hola");
        assert!(matches!(
            mock.generate("say \"Thanks\"").await,
            Err(BackendError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_echo_returns_prompt() {
        let mock = MockBackend::new(MockMode::Echo).named("echo");
        assert_eq!(mock.generate("same").await.unwrap(), "same");
        assert_eq!(mock.model_name(), "echo");
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let mock = MockBackend::new(MockMode::Fixed(MockReply::text("late").after(30)));
        let start = std::time::Instant::now();
        mock.generate("p").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(25));
    }
}
