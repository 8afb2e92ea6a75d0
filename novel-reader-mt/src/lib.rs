//! Translation backends for novel-reader
//!
//! This crate turns a [`TranslationRequest`](novel_reader::TranslationRequest)
//! into translated text with a fixed two-model policy, and runs the reader's
//! state machine as an async session.
//!
//! # Workflow Example
//!
//! ```ignore
//! use novel_reader::DEFAULT_LANGUAGE;
//! use novel_reader_mt::{ModelFallbackClient, SessionHandle, TranslatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Read credentials and models once at startup
//!     let config = TranslatorConfig::from_env()?;
//!
//!     // 2. Primary model with a single fallback hop
//!     let client = ModelFallbackClient::from_config(&config)?;
//!
//!     // 3. Feed selections into the session and read the panel
//!     let session = SessionHandle::spawn(client, DEFAULT_LANGUAGE);
//!     session.release("It was the best of times.").await?;
//!     println!("{:?}", session.settled().await?);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod fallback;
pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod session;


pub use backend::TextBackend;
pub use config::TranslatorConfig;
pub use error::{BackendError, ConfigError, SessionError, TranslateError, TranslateResult};
pub use fallback::ModelFallbackClient;
pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockMode, MockReply};
pub use prompt::build_prompt;
pub use session::{SessionCommand, SessionHandle};
