//! Error types shared by the normalizers, the transport and the resource
//! façades.

/// A single value that failed its kind-specific grammar.
///
/// Normalizers never log or swallow; they hand this back and let the caller
/// decide what the active [`ValidationMode`](crate::validation::ValidationMode)
/// does with it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidValue(pub String);

impl InvalidValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// Raised in strict mode, or when a composite input is unusable as a whole.
    #[error("{0}")]
    Validation(String),

    /// Only surfaced when the transport was built with `raise_on_error`.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<InvalidValue> for LexiconError {
    fn from(err: InvalidValue) -> Self {
        LexiconError::Validation(err.0)
    }
}

pub type Result<T> = std::result::Result<T, LexiconError>;
