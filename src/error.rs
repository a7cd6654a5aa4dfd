use std::fmt;

use thiserror::Error;

/// One rejected form field with the reason shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Field-level validation failures collected before a request is built.
/// A non-empty set blocks submission; no network call is made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.fields.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Everything that can go wrong on the client side.
///
/// `Network` is retryable, `Remote` carries the server's message
/// verbatim, and the two in-flight rejections tell the caller to wait
/// for the pending operation instead of racing it.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Remote(String),

    #[error("a meal analysis is already in progress")]
    AnalysisInFlight,

    #[error("a day refresh is in progress, try again")]
    RefreshInFlight,
}

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::AnalysisInFlight | Self::RefreshInFlight
        )
    }
}
