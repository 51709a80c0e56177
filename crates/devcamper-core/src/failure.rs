use std::fmt;

use http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Native signals emitted by the document store adapters
///
/// These never reach clients; classification rules match on them.
pub mod signature {
    /// Discriminator raised when an identifier cannot be cast for lookup
    pub const CAST_ERROR: &str = "CastError";
    /// Discriminator raised for aggregate schema validation failures
    pub const VALIDATION_ERROR: &str = "ValidationError";
    /// Numeric code raised for a duplicate unique-key write
    pub const DUPLICATE_KEY: i64 = 11000;
}

/// Category of a failure, used by classification rules
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Identifier has the wrong shape for a lookup
    InvalidReference,
    /// Write violates a uniqueness constraint
    UniquenessConflict,
    /// One or more field constraints were violated
    ValidationFailure,
    /// Nothing more specific is known
    #[default]
    Unclassified,
}

/// Opaque backend-specific error signal
///
/// Deserializes from either an integer (`11000`) or a string (`"CastError"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeCode {
    /// Numeric code such as a driver error number
    Numeric(i64),
    /// Named discriminator such as an exception or SQLSTATE name
    Name(String),
}

impl NativeCode {
    /// Named discriminator
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl From<i64> for NativeCode {
    fn from(code: i64) -> Self {
        Self::Numeric(code)
    }
}

impl From<&str> for NativeCode {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for NativeCode {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for NativeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Something that prevented a request from completing normally
///
/// Built at the point of error and handed, unmodified, to the pipeline at
/// the outermost boundary. Inner layers never decide HTTP semantics; they
/// only record enough metadata (`kind`, `native_code`) for classification.
/// `Failure::default()` is the failure with every field absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Failure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable description
    pub message: Option<String>,
    /// Provider-specific signal, used only for classification
    pub native_code: Option<NativeCode>,
    /// Status declared by the raising code, if any
    pub status: Option<u16>,
    /// Per-field violation messages in the order they were found
    pub fields: IndexMap<String, String>,
}

impl Failure {
    /// Create a failure of the given kind with no other metadata
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Explicit domain error with a status and client-facing message
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.as_u16()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Unclassified failure carrying only a message
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Identifier could not be used for a lookup
    pub fn invalid_reference() -> Self {
        Self::new(FailureKind::InvalidReference).with_native_code(NativeCode::name(signature::CAST_ERROR))
    }

    /// Write violated a uniqueness constraint
    pub fn uniqueness_conflict() -> Self {
        Self::new(FailureKind::UniquenessConflict).with_native_code(NativeCode::Numeric(signature::DUPLICATE_KEY))
    }

    /// Aggregate validation failure with every violated field
    pub fn validation<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: FailureKind::ValidationFailure,
            native_code: Some(NativeCode::name(signature::VALIDATION_ERROR)),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            ..Self::default()
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the native code
    #[must_use]
    pub fn with_native_code(mut self, code: impl Into<NativeCode>) -> Self {
        self.native_code = Some(code.into());
        self
    }

    /// Set the declared status
    #[must_use]
    pub const fn with_declared_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Append a field violation, keeping insertion order
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.insert(field.into(), message.into());
        self
    }

    /// Declared status when it is a usable HTTP status code (100..=599)
    pub fn declared_status(&self) -> Option<StatusCode> {
        self.status
            .filter(|s| (100..=599).contains(s))
            .and_then(|s| StatusCode::from_u16(s).ok())
    }

    /// Description when present and non-empty
    pub fn non_empty_message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure", self.kind)?;
        if let Some(message) = self.non_empty_message() {
            write!(f, ": {message}")?;
        }
        if !self.fields.is_empty() {
            write!(f, " ({} field violations)", self.fields.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for Failure {}
