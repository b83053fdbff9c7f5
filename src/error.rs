//! Error types for value construction, persistence and URI transcoding.

use std::fmt;

use crate::validation::InvalidResult;

/// A validating factory rejected caller-supplied input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    result: InvalidResult,
}

impl ValidationError {
    /// Wraps an invalid result.
    #[must_use]
    pub const fn new(result: InvalidResult) -> Self {
        Self { result }
    }

    /// Returns the structured failure.
    #[must_use]
    pub const fn result(&self) -> &InvalidResult {
        &self.result
    }

    /// Returns the last component of the message key.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.result.reason()
    }

    /// Unwraps into the structured failure.
    #[must_use]
    pub fn into_result(self) -> InvalidResult {
        self.result
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.result)
    }
}

impl std::error::Error for ValidationError {}

impl From<InvalidResult> for ValidationError {
    fn from(result: InvalidResult) -> Self {
        Self::new(result)
    }
}

/// Previously persisted data failed re-validation on load.
///
/// Distinct from [`ValidationError`]: the data did not come from a caller,
/// so this signals a data-integrity problem rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptionError {
    type_name: &'static str,
    result: InvalidResult,
}

impl CorruptionError {
    /// Creates a corruption error for the named value type.
    #[must_use]
    pub fn new(type_name: &'static str, result: InvalidResult) -> Self {
        tracing::warn!(
            type_name,
            key = result.key(),
            "persisted value failed re-validation"
        );
        Self { type_name, result }
    }

    /// Returns the name of the value type that failed to load.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the structured failure.
    #[must_use]
    pub const fn result(&self) -> &InvalidResult {
        &self.result
    }
}

impl fmt::Display for CorruptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupted persisted {}: {}", self.type_name, self.result)
    }
}

impl std::error::Error for CorruptionError {}

/// Errors that can occur while transcoding URI text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriError {
    /// A `%` not followed by two hex digits
    InvalidPercentEncoding {
        /// Byte index of the `%` in the input
        index: usize,
    },
    /// Percent-encoded octets that do not form valid UTF-8
    InvalidUtf8 {
        /// Byte index of the first escape of the offending sequence
        index: usize,
    },
    /// The output sink rejected a write
    Sink,
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPercentEncoding { index } => {
                write!(
                    f,
                    "invalid percent-encoded octet at index {index}; expected '%' followed by two hex digits"
                )
            }
            Self::InvalidUtf8 { index } => {
                write!(f, "percent-encoded octets at index {index} are not valid UTF-8")
            }
            Self::Sink => write!(f, "output sink rejected a write"),
        }
    }
}

impl std::error::Error for UriError {}

impl From<fmt::Error> for UriError {
    fn from(_: fmt::Error) -> Self {
        Self::Sink
    }
}
