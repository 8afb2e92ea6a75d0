//! Primary/fallback translation client
//!
//! [`ModelFallbackClient`] sends one prompt to the primary backend and only
//! on a hard error (network, quota, access) retries the identical prompt on
//! the secondary backend. An empty answer from the primary is a failure, not
//! a reason to fall back.
//!
//! # Example
//!
//! ```ignore
//! use novel_reader_mt::{ModelFallbackClient, TranslatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ModelFallbackClient::from_config(&TranslatorConfig::from_env()?)?;
//!     let text = client.translate("Elementary, my dear Watson.", "French").await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

use crate::backend::TextBackend;
use crate::config::TranslatorConfig;
use crate::error::{ConfigError, TranslateError, TranslateResult};
use crate::gemini::GeminiBackend;
use crate::prompt::build_prompt;
use novel_reader::{TranslationOutcome, TranslationRequest, TranslationResult};
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
enum Backends {
    Missing,
    Ready {
        primary: Arc<dyn TextBackend>,
        secondary: Arc<dyn TextBackend>,
    },
}

#[derive(Clone)]
pub struct ModelFallbackClient {
    backends: Backends,
}

impl ModelFallbackClient {
    /// Build Gemini backends for the configured primary and fallback models.
    ///
    /// Without credentials the client is still constructed; every call then
    /// fails with [`TranslateError::MissingCredentials`].
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, ConfigError> {
        if !config.has_credentials() {
            return Ok(Self {
                backends: Backends::Missing,
            });
        }

        let primary = GeminiBackend::new(config, config.primary_model.clone())?;
        let secondary = GeminiBackend::new(config, config.fallback_model.clone())?;
        Ok(Self::with_backends(config, Arc::new(primary), Arc::new(secondary)))
    }

    /// Use explicit backends. Credentials are still checked against `config`.
    pub fn with_backends(
        config: &TranslatorConfig,
        primary: Arc<dyn TextBackend>,
        secondary: Arc<dyn TextBackend>,
    ) -> Self {
        let backends = if config.has_credentials() {
            Backends::Ready { primary, secondary }
        } else {
            Backends::Missing
        };
        Self { backends }
    }

    pub fn has_credentials(&self) -> bool {
        matches!(self.backends, Backends::Ready { .. })
    }

    /// Translate `source_text` into `target_language`.
    pub async fn translate(
        &self,
        source_text: &str,
        target_language: &str,
    ) -> TranslateResult<String> {
        let (primary, secondary) = match &self.backends {
            Backends::Missing => {
                error!("translation backend credentials are missing");
                return Err(TranslateError::MissingCredentials);
            }
            Backends::Ready { primary, secondary } => (primary, secondary),
        };

        let prompt = build_prompt(source_text, target_language);

        let response = match primary.generate(&prompt).await {
            Ok(response) => response,
            Err(primary_err) => {
                warn!(
                    model = primary.model_name(),
                    error = %primary_err,
                    "primary model failed, attempting fallback"
                );
                secondary.generate(&prompt).await.map_err(|err| {
                    error!(model = secondary.model_name(), error = %err, "fallback model failed");
                    TranslateError::Backend(err)
                })?
            }
        };

        let text = response.trim();
        if text.is_empty() {
            error!("translation backend returned an empty response");
            return Err(TranslateError::EmptyResponse);
        }
        Ok(text.to_string())
    }

    /// Run a request from the orchestrator, folding any failure into the
    /// result so nothing propagates past this boundary.
    pub async fn execute(&self, request: &TranslationRequest) -> TranslationResult {
        let outcome: TranslationOutcome = self
            .translate(&request.source_text, &request.target_language)
            .await
            .into();

        TranslationResult {
            request_id: request.id,
            outcome,
        }
    }
}

impl std::fmt::Debug for ModelFallbackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ModelFallbackClient");
        match &self.backends {
            Backends::Missing => s.field("backends", &"missing credentials"),
            Backends::Ready { primary, secondary } => s
                .field("primary", &primary.model_name())
                .field("secondary", &secondary.model_name()),
        };
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::mock::MockBackend;
    use novel_reader::{Selection, TranslationOrchestrator};

    fn client(primary: &Arc<MockBackend>, secondary: &Arc<MockBackend>) -> ModelFallbackClient {
        ModelFallbackClient::with_backends(
            &TranslatorConfig::new("test-key"),
            primary.clone(),
            secondary.clone(),
        )
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = Arc::new(MockBackend::fixed("Hola"));
        let secondary = Arc::new(MockBackend::fixed("unused"));

        let result = client(&primary, &secondary).translate("Hello", "Spanish").await;
        assert_eq!(result, Ok("Hola".to_string()));
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_primary_quota_error_falls_back() {
        let primary = Arc::new(MockBackend::failing(BackendError::Quota(
            "RESOURCE_EXHAUSTED: Quota exceeded".to_string(),
        )));
        let secondary = Arc::new(MockBackend::fixed("Bonjour"));

        let result = client(&primary, &secondary).translate("Hello", "French").await;
        assert_eq!(result, Ok("Bonjour".to_string()));
        assert_eq!(primary.call_count(), 1);
        assert_eq!(secondary.call_count(), 1);
        // Identical prompt on both hops.
        assert_eq!(primary.prompts(), secondary.prompts());
        assert!(secondary.prompts()[0].contains("into French"));
    }

    #[tokio::test]
    async fn test_both_failing_surfaces_secondary_message() {
        let primary = Arc::new(MockBackend::failing(BackendError::Access(
            "PERMISSION_DENIED: model not available".to_string(),
        )));
        let secondary = Arc::new(MockBackend::failing(BackendError::Network(
            "Request failed: connection refused".to_string(),
        )));

        let err = client(&primary, &secondary)
            .translate("Hello", "French")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }

    #[tokio::test]
    async fn test_empty_primary_does_not_fall_back() {
        let primary = Arc::new(MockBackend::empty());
        let secondary = Arc::new(MockBackend::fixed("Bonjour"));

        let result = client(&primary, &secondary).translate("Hello", "French").await;
        assert_eq!(result, Err(TranslateError::EmptyResponse));
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_response_counts_as_empty() {
        let primary = Arc::new(MockBackend::fixed("  \n"));
        let secondary = Arc::new(MockBackend::fixed("Bonjour"));

        let err = client(&primary, &secondary)
            .translate("Hello", "French")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "translation failed");
    }

    #[tokio::test]
    async fn test_empty_secondary_is_failure() {
        let primary = Arc::new(MockBackend::failing(BackendError::Quota("quota".to_string())));
        let secondary = Arc::new(MockBackend::empty());

        let result = client(&primary, &secondary).translate("Hello", "French").await;
        assert_eq!(result, Err(TranslateError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_response_is_trimmed() {
        let primary = Arc::new(MockBackend::fixed("\nBonjour\n"));
        let secondary = Arc::new(MockBackend::empty());
        let result = client(&primary, &secondary).translate("Hello", "French").await;
        assert_eq!(result.unwrap(), "Bonjour");
    }

    #[tokio::test]
    async fn test_missing_credentials_makes_no_calls() {
        let primary = Arc::new(MockBackend::fixed("Hola"));
        let secondary = Arc::new(MockBackend::fixed("Hola"));
        let client = ModelFallbackClient::with_backends(
            &TranslatorConfig::without_credentials(),
            primary.clone(),
            secondary.clone(),
        );

        assert!(!client.has_credentials());
        let err = client.translate("Hello", "Spanish").await.unwrap_err();
        assert_eq!(err, TranslateError::MissingCredentials);
        assert_eq!(err.to_string(), "missing credentials");
        assert_eq!(primary.call_count(), 0);
        assert_eq!(secondary.call_count(), 0);
    }

    #[tokio::test]
    async fn test_from_config_without_key() {
        let client =
            ModelFallbackClient::from_config(&TranslatorConfig::without_credentials()).unwrap();
        assert!(!client.has_credentials());
        assert_eq!(
            client.translate("Hello", "Spanish").await,
            Err(TranslateError::MissingCredentials)
        );
    }

    #[tokio::test]
    async fn test_execute_tags_result_with_request_id() {
        let primary = Arc::new(MockBackend::failing(BackendError::Quota("quota".to_string())));
        let secondary = Arc::new(MockBackend::fixed("Bonjour"));
        let client = client(&primary, &secondary);

        let mut orchestrator = TranslationOrchestrator::new("French");
        let request = orchestrator.select(Selection::new("Hello").unwrap());
        let result = client.execute(&request).await;

        assert_eq!(result, TranslationResult::success(request.id, "Bonjour"));
        assert!(orchestrator.complete(result));
    }

    #[tokio::test]
    async fn test_execute_folds_failure_into_outcome() {
        let primary = Arc::new(MockBackend::failing(BackendError::Quota("first".to_string())));
        let secondary = Arc::new(MockBackend::failing(BackendError::Quota("second".to_string())));
        let client = client(&primary, &secondary);

        let mut orchestrator = TranslationOrchestrator::new("French");
        let request = orchestrator.select(Selection::new("Hello").unwrap());
        let result = client.execute(&request).await;
        assert_eq!(result.outcome, TranslationOutcome::Failure("second".to_string()));
    }
}
