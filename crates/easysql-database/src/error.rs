//! Error taxonomy shared by every builder operation.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for builder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The three families a failure can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied arguments violate a contract. Never reaches the driver.
    Validation,
    /// The database rejected or failed a statement.
    Driver,
    /// The connection could not be set up.
    Configuration,
}

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "ES601")]
    Connection,
    #[serde(rename = "ES611")]
    Read,
    #[serde(rename = "ES612")]
    Create,
    #[serde(rename = "ES613")]
    Update,
    #[serde(rename = "ES614")]
    Delete,
    #[serde(rename = "ES615")]
    Alter,
    #[serde(rename = "ES701")]
    Config,
    #[serde(rename = "ES711")]
    MissingArgument,
    #[serde(rename = "ES714")]
    InvalidArgument,
    #[serde(rename = "ES715")]
    Cardinality,
    #[serde(rename = "ES716")]
    InvalidIdentifier,
    #[serde(rename = "ES717")]
    DuplicateColumn,
    #[serde(rename = "ES721")]
    InvalidJson,
}

impl ErrorCode {
    /// The code as it appears in envelopes and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "ES601",
            Self::Read => "ES611",
            Self::Create => "ES612",
            Self::Update => "ES613",
            Self::Delete => "ES614",
            Self::Alter => "ES615",
            Self::Config => "ES701",
            Self::MissingArgument => "ES711",
            Self::InvalidArgument => "ES714",
            Self::Cardinality => "ES715",
            Self::InvalidIdentifier => "ES716",
            Self::DuplicateColumn => "ES717",
            Self::InvalidJson => "ES721",
        }
    }

    /// Which family of [`Error`] this code belongs to.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::Connection | Self::Config => ErrorKind::Configuration,
            Self::Read | Self::Create | Self::Update | Self::Delete | Self::Alter => {
                ErrorKind::Driver
            }
            Self::MissingArgument
            | Self::InvalidArgument
            | Self::Cardinality
            | Self::InvalidIdentifier
            | Self::DuplicateColumn
            | Self::InvalidJson => ErrorKind::Validation,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure a builder call can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Arguments violate a contract (missing field, wrong shape, cardinality, bad identifier).
    #[error("Validation error [{code}]: {message}")]
    Validation { code: ErrorCode, message: String },

    /// The driver failed the statement. `message` is passed through untouched.
    #[error("Driver error [{code}]: {message}")]
    Driver { code: ErrorCode, message: String },

    /// Connection setup failed before any statement could run.
    #[error("Configuration error [{code}]: {message}")]
    Configuration { code: ErrorCode, message: String },
}

impl Error {
    /// Build an error from a code and message, picking the variant from the code's kind.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match code.kind() {
            ErrorKind::Validation => Self::Validation { code, message },
            ErrorKind::Driver => Self::Driver { code, message },
            ErrorKind::Configuration => Self::Configuration { code, message },
        }
    }

    /// Create a validation error.
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Create a missing argument error for argument `position` of `function`.
    pub fn missing_argument(position: usize, function: &str) -> Self {
        Self::validation(
            ErrorCode::MissingArgument,
            format!("Missing argument {position} for {function}"),
        )
    }

    /// Create a cardinality error for argument `position` of `function`.
    pub fn cardinality(position: usize, function: &str, expected: usize) -> Self {
        Self::validation(
            ErrorCode::Cardinality,
            format!("More than {expected} value passed in argument {position} for {function}"),
        )
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. }
            | Self::Driver { code, .. }
            | Self::Configuration { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Driver { message, .. }
            | Self::Configuration { message, .. } => message,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Driver { .. } => ErrorKind::Driver,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    #[must_use]
    pub fn is_driver(&self) -> bool {
        matches!(self, Self::Driver { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_picks_variant_from_code() {
        assert!(Error::new(ErrorCode::Cardinality, "x").is_validation());
        assert!(Error::new(ErrorCode::Delete, "x").is_driver());
        assert_eq!(
            Error::new(ErrorCode::Connection, "x").kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_display() {
        let err = Error::missing_argument(2, "insert()");
        assert_eq!(
            err.to_string(),
            "Validation error [ES711]: Missing argument 2 for insert()"
        );
    }

    #[test]
    fn test_code_serializes_as_string() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::InvalidIdentifier).unwrap(),
            "\"ES716\""
        );
        let code: ErrorCode = serde_json::from_str("\"ES613\"").unwrap();
        assert_eq!(code, ErrorCode::Update);
        assert_eq!(code.as_str(), "ES613");
    }
}
