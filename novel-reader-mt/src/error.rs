/// Error types for translation backends and the fallback client
use thiserror::Error;

/// A hard failure from one text-generation backend.
///
/// The message is kept human-readable; it is what the reader sees when no
/// further fallback is available.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport failure: connection refused, timeout, DNS
    #[error("{0}")]
    Network(String),
    /// Rate limit or quota exhausted
    #[error("{0}")]
    Quota(String),
    /// Key rejected or model not available to this key
    #[error("{0}")]
    Access(String),
    /// Any other non-success HTTP status
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The backend answered with a body we could not read
    #[error("{0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::InvalidResponse(format!("Failed to parse response: {}", err))
        } else {
            BackendError::Network(format!("Request failed: {}", err))
        }
    }
}

/// Final failure of a translate call, after any fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("translation failed")]
    EmptyResponse,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("API key cannot be empty")]
    EmptyApiKey,
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("reader session has stopped")]
    Stopped,
}

pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_surfaces_verbatim() {
        let err = TranslateError::from(BackendError::Quota(
            "RESOURCE_EXHAUSTED: Quota exceeded".to_string(),
        ));
        assert_eq!(err.to_string(), "RESOURCE_EXHAUSTED: Quota exceeded");

        let err = BackendError::Status {
            status: 500,
            message: "INTERNAL: backend exploded".to_string(),
        };
        assert_eq!(err.to_string(), "INTERNAL: backend exploded");
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(TranslateError::MissingCredentials.to_string(), "missing credentials");
        assert_eq!(TranslateError::EmptyResponse.to_string(), "translation failed");
    }
}
