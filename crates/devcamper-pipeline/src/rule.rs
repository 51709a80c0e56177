use devcamper_core::{ErrorMessage, Failure, FailureKind, NativeCode, SERVER_ERROR, signature};
use http::StatusCode;
use serde::Deserialize;

use crate::classifier::Classification;
use crate::error::RuleError;

/// Message for identifiers that cannot be looked up
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";
/// Message for uniqueness conflicts
pub const DUPLICATE_FIELD_VALUE: &str = "duplicate field value entered";

/// Predicate over a failure's kind and native code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Failure kind equals this kind
    Kind(FailureKind),
    /// Native code equals this code
    Code(NativeCode),
    /// Any of the inner matchers
    Any(Vec<Matcher>),
}

impl Matcher {
    /// Whether the failure satisfies this predicate
    pub fn matches(&self, failure: &Failure) -> bool {
        match self {
            Self::Kind(kind) => failure.kind == *kind,
            Self::Code(code) => failure.native_code.as_ref() == Some(code),
            Self::Any(matchers) => matchers.iter().any(|m| m.matches(failure)),
        }
    }
}

/// How a matched rule produces the client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Fixed string, whatever the failure says
    Fixed(String),
    /// Every per-field message, in order, always as a list
    FieldMessages,
    /// The failure's own message, or "Server Error" when empty
    Passthrough,
}

impl Transform {
    /// Produce the client message for a failure
    pub fn render(&self, failure: &Failure) -> ErrorMessage {
        match self {
            Self::Fixed(message) => ErrorMessage::Single(message.clone()),
            Self::FieldMessages => ErrorMessage::Many(failure.fields.values().cloned().collect()),
            Self::Passthrough => passthrough_message(failure),
        }
    }
}

pub(crate) fn passthrough_message(failure: &Failure) -> ErrorMessage {
    ErrorMessage::Single(failure.non_empty_message().unwrap_or(SERVER_ERROR).to_owned())
}

/// A named predicate → (status, message) mapping
///
/// Deserializes from configuration:
///
/// ```toml
/// [[errors.rules]]
/// name = "postgres_unique"
/// code = "23505"
/// status = 400
/// message = "duplicate field value entered"
/// ```
///
/// `kind` and `code` may both be given (either one matches). Instead of
/// `message`, `transform = "fields"` or `transform = "passthrough"` selects
/// a computed message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct Rule {
    name: String,
    matcher: Matcher,
    status: StatusCode,
    transform: Transform,
}

impl Rule {
    /// Create a rule
    pub fn new(name: impl Into<String>, matcher: Matcher, status: StatusCode, transform: Transform) -> Self {
        Self {
            name: name.into(),
            matcher,
            status,
            transform,
        }
    }

    /// Rule name, used in operator logs only
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's predicate
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Status produced on match
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message transform applied on match
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Whether the rule applies to the failure
    pub fn matches(&self, failure: &Failure) -> bool {
        self.matcher.matches(failure)
    }

    /// Build the classification this rule yields for a failure
    pub fn apply(&self, failure: &Failure) -> Classification {
        Classification {
            status: self.status,
            message: self.transform.render(failure),
            rule: Some(self.name.clone()),
        }
    }
}

/// Rules for the document-store signatures, highest priority first
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "invalid_reference",
            Matcher::Any(vec![
                Matcher::Code(NativeCode::name(signature::CAST_ERROR)),
                Matcher::Kind(FailureKind::InvalidReference),
            ]),
            StatusCode::NOT_FOUND,
            Transform::Fixed(RESOURCE_NOT_FOUND.to_owned()),
        ),
        Rule::new(
            "uniqueness_conflict",
            Matcher::Any(vec![
                Matcher::Code(NativeCode::Numeric(signature::DUPLICATE_KEY)),
                Matcher::Kind(FailureKind::UniquenessConflict),
            ]),
            StatusCode::BAD_REQUEST,
            Transform::Fixed(DUPLICATE_FIELD_VALUE.to_owned()),
        ),
        Rule::new(
            "field_validation",
            Matcher::Any(vec![
                Matcher::Kind(FailureKind::ValidationFailure),
                Matcher::Code(NativeCode::name(signature::VALIDATION_ERROR)),
            ]),
            StatusCode::BAD_REQUEST,
            Transform::FieldMessages,
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    name: String,
    #[serde(default)]
    kind: Option<FailureKind>,
    #[serde(default)]
    code: Option<NativeCode>,
    status: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    transform: Option<RawTransform>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawTransform {
    Fields,
    Passthrough,
}

impl TryFrom<RawRule> for Rule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        if raw.name.trim().is_empty() {
            return Err(RuleError::MissingName);
        }

        let mut matchers = Vec::with_capacity(2);
        if let Some(code) = raw.code {
            matchers.push(Matcher::Code(code));
        }
        if let Some(kind) = raw.kind {
            matchers.push(Matcher::Kind(kind));
        }
        let matcher = match matchers.len() {
            0 => return Err(RuleError::NoPredicate { rule: raw.name }),
            1 => matchers.remove(0),
            _ => Matcher::Any(matchers),
        };

        let status = StatusCode::from_u16(raw.status)
            .ok()
            .filter(|_| (100..=599).contains(&raw.status))
            .ok_or_else(|| RuleError::InvalidStatus {
                rule: raw.name.clone(),
                status: raw.status,
            })?;

        let transform = match (raw.message, raw.transform) {
            (Some(message), None) => Transform::Fixed(message),
            (None, Some(RawTransform::Fields)) => Transform::FieldMessages,
            (None, Some(RawTransform::Passthrough)) => Transform::Passthrough,
            (None, None) => return Err(RuleError::NoMessage { rule: raw.name }),
            (Some(_), Some(_)) => return Err(RuleError::ConflictingMessage { rule: raw.name }),
        };

        Ok(Self {
            name: raw.name,
            matcher,
            status,
            transform,
        })
    }
}
