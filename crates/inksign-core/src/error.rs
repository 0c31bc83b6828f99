use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(String),

    #[error("Page {index} not found (document has {page_count} pages)")]
    PageNotFound { index: usize, page_count: usize },

    #[error("Invalid stroke #{index}: {reason}")]
    InvalidStroke { index: usize, reason: String },
}

impl SignError {
    /// True when the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SignError::Parse(_) | SignError::PageNotFound { .. } | SignError::InvalidStroke { .. }
        )
    }
}
