use http::StatusCode;
use indexmap::IndexMap;

use crate::{Failure, FailureKind, NativeCode};

/// Trait for domain errors that can be turned into HTTP failures
///
/// Implemented by each feature crate's error type. Implementors only
/// describe themselves; the server's pipeline decides the final status and
/// message, keeping domain errors decoupled from axum.
pub trait HttpError: std::error::Error {
    /// Failure category, when the error knows it
    fn kind(&self) -> FailureKind {
        FailureKind::Unclassified
    }

    /// Backend-specific signal used for classification
    fn native_code(&self) -> Option<NativeCode> {
        None
    }

    /// Status the error explicitly asks for
    fn declared_status(&self) -> Option<StatusCode> {
        None
    }

    /// Message safe to expose to API consumers
    fn client_message(&self) -> Option<String> {
        None
    }

    /// Per-field violations, in order
    fn field_messages(&self) -> IndexMap<String, String> {
        IndexMap::new()
    }

    /// Describe this error as a failure for the pipeline
    fn to_failure(&self) -> Failure {
        Failure {
            kind: self.kind(),
            message: self.client_message(),
            native_code: self.native_code(),
            status: self.declared_status().map(|s| s.as_u16()),
            fields: self.field_messages(),
        }
    }
}
