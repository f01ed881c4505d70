//! A uniform JSON wrapper around the outcome of any builder call.
//!
//! ```json
//! { "code": 200, "status": "success", "data": [...] }
//! { "code": 400, "status": "error", "error": { "code": "ES711", "message": "..." } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorCode, ErrorKind, Result};

/// Outcome tag of an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// Reserved. Nothing in this crate produces it, but it is accepted when parsing.
    Fail,
    Error,
}

/// The `error` member of a failed [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// HTTP-equivalent status code.
    pub code: u16,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Envelope {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            code: 200,
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &Error) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Driver => 500,
            ErrorKind::Configuration => 503,
        };
        Self {
            code,
            status: Status::Error,
            data: None,
            error: Some(ErrorBody {
                code: err.code(),
                message: err.message().to_string(),
            }),
        }
    }

    /// Wrap the result of a builder call.
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result.and_then(|data| serde_json::to_value(data).map_err(invalid_json)) {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }

    /// Parse an envelope previously produced by [`Self::to_json`].
    ///
    /// # Errors
    /// `ES721` if `json` is not a valid envelope.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(invalid_json)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// `ES721` if the data cannot be represented as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(invalid_json)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Unwrap the data of a successful envelope, or turn the error back into an [`Error`].
    ///
    /// # Errors
    /// The carried error when the status is anything but `success`.
    pub fn into_result(self) -> Result<serde_json::Value> {
        match (self.status, self.error) {
            (Status::Success, _) => Ok(self.data.unwrap_or(serde_json::Value::Null)),
            (_, Some(body)) => Err(Error::new(body.code, body.message)),
            (status, None) => Err(Error::validation(
                ErrorCode::InvalidArgument,
                format!("Envelope has status {status:?} but no error"),
            )),
        }
    }
}

fn invalid_json(err: serde_json::Error) -> Error {
    Error::validation(
        ErrorCode::InvalidJson,
        format!("Syntax error: the input does not contain valid JSON: {err}"),
    )
}
