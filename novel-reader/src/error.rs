//! Errors raised at the reader's boundary, before any core state is touched.

use thiserror::Error;

/// Message shown to the reader when a file of the wrong type is opened.
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Please upload a valid PDF file.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    /// The uploaded file is not the accepted document type
    #[error("Please upload a valid PDF file.")]
    UnsupportedFile { name: String, mime_type: String },

    /// The document could not be opened by the rendering collaborator
    #[error("Failed to load PDF: {0}")]
    DocumentLoad(String),
}

pub type ReaderResult<T> = Result<T, ReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_file_message_is_user_facing() {
        let err = ReaderError::UnsupportedFile {
            name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
        };
        assert_eq!(err.to_string(), UNSUPPORTED_FILE_MESSAGE);
    }
}
