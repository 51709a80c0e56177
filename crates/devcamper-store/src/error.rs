use devcamper_core::{Failure, FailureKind, HttpError, NativeCode, signature};
use http::StatusCode;
use indexmap::IndexMap;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by bootcamp repositories
///
/// Each variant carries the native signal a document store would emit, so
/// the failure pipeline can classify it without knowing this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Identifier could not be cast to a bootcamp id
    #[error("Cast to BootcampId failed for value \"{value}\" at path \"_id\"")]
    Cast { value: String },

    /// Unique index rejected the write
    #[error("E{code} duplicate key error collection: bootcamps index: {index} dup key: {{ {index}: \"{value}\" }}")]
    Duplicate { code: i64, index: String, value: String },

    /// One or more schema constraints were violated
    #[error("Bootcamp validation failed: {}", summarize(.errors))]
    Validation { errors: IndexMap<String, String> },

    /// Well-formed id with no matching document
    #[error("Bootcamp not found with id of {id}")]
    NotFound { id: String },
}

impl StoreError {
    /// Duplicate-key error for the given unique index
    pub fn duplicate(index: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            code: signature::DUPLICATE_KEY,
            index: index.into(),
            value: value.into(),
        }
    }
}

fn summarize(errors: &IndexMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl HttpError for StoreError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Cast { .. } => FailureKind::InvalidReference,
            Self::Duplicate { .. } => FailureKind::UniquenessConflict,
            Self::Validation { .. } => FailureKind::ValidationFailure,
            Self::NotFound { .. } => FailureKind::Unclassified,
        }
    }

    fn native_code(&self) -> Option<NativeCode> {
        match self {
            Self::Cast { .. } => Some(NativeCode::name(signature::CAST_ERROR)),
            Self::Duplicate { code, .. } => Some(NativeCode::Numeric(*code)),
            Self::Validation { .. } => Some(NativeCode::name(signature::VALIDATION_ERROR)),
            Self::NotFound { .. } => None,
        }
    }

    fn declared_status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    fn client_message(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn field_messages(&self) -> IndexMap<String, String> {
        match self {
            Self::Validation { errors } => errors.clone(),
            _ => IndexMap::new(),
        }
    }
}

impl From<StoreError> for Failure {
    fn from(error: StoreError) -> Self {
        error.to_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_error_carries_cast_signature() {
        let failure = Failure::from(StoreError::Cast { value: "abc".to_owned() });
        assert_eq!(failure.kind, FailureKind::InvalidReference);
        assert_eq!(failure.native_code, Some(NativeCode::name("CastError")));
        assert!(failure.status.is_none());
    }

    #[test]
    fn duplicate_carries_numeric_code() {
        let error = StoreError::duplicate("name_1", "Devworks Bootcamp");
        assert!(error.to_string().starts_with("E11000 duplicate key error"));

        let failure = Failure::from(error);
        assert_eq!(failure.native_code, Some(NativeCode::Numeric(11000)));
    }

    #[test]
    fn validation_keeps_every_field() {
        let errors: IndexMap<_, _> = [
            ("name".to_owned(), "Please add a name".to_owned()),
            ("address".to_owned(), "Please add an address".to_owned()),
        ]
        .into_iter()
        .collect();
        let error = StoreError::Validation { errors };

        assert_eq!(
            error.to_string(),
            "Bootcamp validation failed: name: Please add a name, address: Please add an address"
        );

        let failure = Failure::from(error);
        assert_eq!(failure.kind, FailureKind::ValidationFailure);
        assert_eq!(failure.fields.len(), 2);
    }

    #[test]
    fn not_found_declares_status() {
        let failure = Failure::from(StoreError::NotFound {
            id: "0123456789abcdef0123456789abcdef".to_owned(),
        });
        assert_eq!(failure.status, Some(404));
        assert_eq!(
            failure.message.as_deref(),
            Some("Bootcamp not found with id of 0123456789abcdef0123456789abcdef")
        );
    }
}
