use thiserror::Error;

/// Errors raised by store mutations before anything is changed.
///
/// A missing target id is not an error: mutations report it as `Ok(None)`
/// (or `false` for delete) so callers can treat stale state as a normal
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("appointment with id {0} already exists")]
    DuplicateId(String),

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl StoreError {
    /// Create validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateId(_) => Some("id"),
            Self::Validation { field, .. } => Some(field),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reject empty or whitespace-only text.
pub(crate) fn require_text(field: &'static str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Reject ids that would not survive as a single URL path segment.
///
/// Only RFC 3986 unreserved characters are accepted.
pub(crate) fn require_path_segment(field: &'static str, value: &str) -> StoreResult<()> {
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~');
    if !value.chars().all(unreserved) {
        return Err(StoreError::validation(
            field,
            "may only contain letters, digits, '-', '_', '.' and '~'",
        ));
    }
    Ok(())
}
