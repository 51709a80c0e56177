use thiserror::Error;

/// Errors raised while building classification rules from configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule has an empty name
    #[error("classification rule must have a non-empty name")]
    MissingName,

    /// Rule matches on nothing
    #[error("classification rule '{rule}' must match on `kind` or `code`")]
    NoPredicate { rule: String },

    /// Status is not a valid HTTP status
    #[error("classification rule '{rule}' has invalid status {status}")]
    InvalidStatus { rule: String, status: u16 },

    /// Neither a message nor a transform was given
    #[error("classification rule '{rule}' needs `message` or `transform`")]
    NoMessage { rule: String },

    /// Both a message and a transform were given
    #[error("classification rule '{rule}' cannot set both `message` and `transform`")]
    ConflictingMessage { rule: String },
}
