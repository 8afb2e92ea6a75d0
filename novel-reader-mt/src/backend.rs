//! Text-generation backend trait
//!
//! A backend answers one prompt with one block of text. The fallback client
//! composes two of them; concrete backends are [`GeminiBackend`] for the
//! real service and [`MockBackend`] for tests.
//!
//! [`GeminiBackend`]: crate::gemini::GeminiBackend
//! [`MockBackend`]: crate::mock::MockBackend

use crate::error::BackendError;
use async_trait::async_trait;

#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Send `prompt` and return the generated text.
    ///
    /// An empty string is a successful (if useless) answer; only transport,
    /// quota, access and protocol problems are errors.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;

    /// Model identifier, used in logs.
    fn model_name(&self) -> &str;
}
