//! Translation requests and their results, correlated by request id

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque correlation token between a dispatched request and its result.
///
/// Only equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub id: RequestId,
    pub source_text: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TranslationOutcome {
    Success(String),
    Failure(String),
}

impl<E: fmt::Display> From<Result<String, E>> for TranslationOutcome {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => TranslationOutcome::Success(text),
            Err(err) => TranslationOutcome::Failure(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub request_id: RequestId,
    pub outcome: TranslationOutcome,
}

impl TranslationResult {
    pub fn success(request_id: RequestId, text: impl Into<String>) -> Self {
        Self {
            request_id,
            outcome: TranslationOutcome::Success(text.into()),
        }
    }

    pub fn failure(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            request_id,
            outcome: TranslationOutcome::Failure(message.into()),
        }
    }
}
