use followback_core::UsernameError;
use thiserror::Error;

/// Errors surfaced to callers of [`crate::Analyzer::analyze`]. Upstream
/// failures never appear here; they are absorbed by the fallback chain.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("invalid username: {0}")]
    Validation(#[from] UsernameError),

    #[error("analysis did not finish within {secs}s")]
    Timeout { secs: u64 },
}

impl AnalyzeError {
    /// Timeouts may succeed on a later attempt; validation errors never do.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
