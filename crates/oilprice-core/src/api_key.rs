//! API key handling with redacted Debug and Display output.

use std::fmt;

use crate::ValidationError;

/// Non-blank API key that never exposes its value in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    inner: String,
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ValidationError::InvalidArgument("API key is required"));
        }
        Ok(Self { inner: key })
    }

    /// The raw key, for the `Authorization` header only.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Key length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED API KEY]")
    }
}
