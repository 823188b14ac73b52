//! Common result and error types for the strata crates.

/// The standard result type for operations that can hit an internal bug.
///
/// `Ok` contains the result value, which may itself express absence
/// (`Option`) or a degraded result after malformed input was skipped. `Err`
/// indicates a broken internal invariant, not a problem with the class data.
/// Malformed class data is reported through
/// a diagnostic sink and the operation still returns `Ok`.
pub type StrataResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in strata, not a problem with user input.
///
/// These errors should never occur during normal operation: they are raised
/// when a fixed, internally generated input (such as a synthetic method
/// template) fails to produce the expected structure.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
