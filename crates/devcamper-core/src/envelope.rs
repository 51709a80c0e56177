use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Literal message used when nothing better is known
pub const SERVER_ERROR: &str = "Server Error";

/// Client-facing failure message: a single string or an ordered list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    /// One message
    Single(String),
    /// Every violation, in order
    Many(Vec<String>),
}

impl ErrorMessage {
    /// The single message, if this is not a list
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(message) => Some(message),
            Self::Many(_) => None,
        }
    }

    /// The message list, if this is not a single message
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Many(messages) => Some(messages),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(message: &str) -> Self {
        Self::Single(message.to_owned())
    }
}

impl From<String> for ErrorMessage {
    fn from(message: String) -> Self {
        Self::Single(message)
    }
}

impl From<Vec<String>> for ErrorMessage {
    fn from(messages: Vec<String>) -> Self {
        Self::Many(messages)
    }
}

/// The only body ever written for a failed request
///
/// Serializes to exactly `{"success": false, "error": <string | string[]>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Always `false` on the failure path
    pub success: bool,
    /// Client-facing message(s)
    pub error: ErrorMessage,
}

impl Envelope {
    /// Wrap a message in a failure envelope
    pub fn failure(message: impl Into<ErrorMessage>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Pair a resolved status with its envelope
pub fn build(status: StatusCode, message: impl Into<ErrorMessage>) -> (StatusCode, Envelope) {
    (status, Envelope::failure(message))
}
