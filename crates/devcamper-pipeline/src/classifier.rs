use devcamper_core::{Envelope, ErrorMessage, Failure, envelope};
use http::StatusCode;

use crate::rule::{self, Rule};

/// Result of classifying a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Resolved HTTP status
    pub status: StatusCode,
    /// Client-facing message(s)
    pub message: ErrorMessage,
    /// Name of the matching rule, `None` for the fallback
    pub rule: Option<String>,
}

impl Classification {
    /// Status and envelope to write
    pub fn into_response_parts(self) -> (StatusCode, Envelope) {
        envelope::build(self.status, self.message)
    }
}

/// Ordered, immutable table of classification rules
///
/// Rules are evaluated top to bottom and the first match wins. When no rule
/// matches, the failure's declared status (or 500) and its own message (or
/// "Server Error") are used.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builder().with_default_rules().build()
    }
}

impl Classifier {
    /// Start an empty builder
    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::default()
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Resolve a failure to a status and message
    ///
    /// Total: every failure, including `Failure::default()`, yields exactly
    /// one classification.
    pub fn classify(&self, failure: &Failure) -> Classification {
        self.rules
            .iter()
            .find(|rule| rule.matches(failure))
            .map_or_else(|| fallback(failure), |rule| rule.apply(failure))
    }
}

fn fallback(failure: &Failure) -> Classification {
    Classification {
        status: failure.declared_status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message: rule::passthrough_message(failure),
        rule: None,
    }
}

/// Registers rules before the classifier is frozen
#[derive(Debug, Default)]
pub struct ClassifierBuilder {
    rules: Vec<Rule>,
}

impl ClassifierBuilder {
    /// Append the document-store rules
    #[must_use]
    pub fn with_default_rules(mut self) -> Self {
        self.rules.extend(rule::default_rules());
        self
    }

    /// Append a rule at the lowest priority so far
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules, keeping their order
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Insert a rule ahead of every rule registered so far
    #[must_use]
    pub fn prepend(mut self, rule: Rule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    /// Freeze the rule table
    pub fn build(self) -> Classifier {
        Classifier { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use devcamper_core::{FailureKind, NativeCode, SERVER_ERROR};

    use super::*;
    use crate::rule::{DUPLICATE_FIELD_VALUE, Matcher, RESOURCE_NOT_FOUND, Transform};

    fn single(message: &str) -> ErrorMessage {
        ErrorMessage::Single(message.to_owned())
    }

    #[test]
    fn cast_error_is_opaque_not_found() {
        let failure = Failure::default()
            .with_native_code("CastError")
            .with_message("Cast to ObjectId failed for value \"abc\" at path \"_id\"");

        let classification = Classifier::default().classify(&failure);

        assert_eq!(classification.status, StatusCode::NOT_FOUND);
        assert_eq!(classification.message, single(RESOURCE_NOT_FOUND));
        assert_eq!(classification.rule.as_deref(), Some("invalid_reference"));
    }

    #[test]
    fn duplicate_key_is_bad_request() {
        let failure = Failure::default()
            .with_native_code(11000)
            .with_message("E11000 duplicate key error collection: devcamper.bootcamps index: name_1");

        let classification = Classifier::default().classify(&failure);

        assert_eq!(classification.status, StatusCode::BAD_REQUEST);
        assert_eq!(classification.message, single(DUPLICATE_FIELD_VALUE));
    }

    #[test]
    fn validation_returns_every_message_in_order() {
        let failure = Failure::validation([
            ("name", "Please add a name"),
            ("description", "Please add a description"),
            ("address", "Please add an address"),
        ]);

        let classification = Classifier::default().classify(&failure);

        assert_eq!(classification.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            classification.message,
            ErrorMessage::Many(vec![
                "Please add a name".to_owned(),
                "Please add a description".to_owned(),
                "Please add an address".to_owned(),
            ])
        );
    }

    #[test]
    fn single_validation_message_is_still_a_list() {
        let failure = Failure::validation([("name", "Please add a name")]);
        let classification = Classifier::default().classify(&failure);
        assert_eq!(classification.message, ErrorMessage::Many(vec!["Please add a name".to_owned()]));
    }

    #[test]
    fn validation_without_fields_is_an_empty_list() {
        let failure = Failure::new(FailureKind::ValidationFailure);
        let classification = Classifier::default().classify(&failure);
        assert_eq!(classification.status, StatusCode::BAD_REQUEST);
        assert_eq!(classification.message, ErrorMessage::Many(Vec::new()));
    }

    #[test]
    fn declared_status_passes_through() {
        let failure = Failure::with_status(StatusCode::FORBIDDEN, "forbidden");
        let classification = Classifier::default().classify(&failure);
        assert_eq!(classification.status, StatusCode::FORBIDDEN);
        assert_eq!(classification.message, single("forbidden"));
        assert!(classification.rule.is_none());
    }

    #[test]
    fn empty_failure_is_server_error() {
        let classification = Classifier::default().classify(&Failure::default());
        assert_eq!(classification.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classification.message, single(SERVER_ERROR));
    }

    #[test]
    fn zero_status_and_empty_message_fall_back() {
        let failure = Failure::unclassified("").with_declared_status(0);
        let classification = Classifier::default().classify(&failure);
        assert_eq!(classification.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classification.message, single(SERVER_ERROR));
    }

    #[test]
    fn first_match_wins() {
        // Carries both the cast and duplicate signals; cast is evaluated first.
        let failure = Failure::new(FailureKind::UniquenessConflict).with_native_code("CastError");
        let classification = Classifier::default().classify(&failure);
        assert_eq!(classification.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn registered_rule_runs_after_defaults() {
        let classifier = Classifier::builder()
            .with_default_rules()
            .rule(Rule::new(
                "postgres_unique",
                Matcher::Code(NativeCode::name("23505")),
                StatusCode::BAD_REQUEST,
                Transform::Fixed(DUPLICATE_FIELD_VALUE.to_owned()),
            ))
            .build();

        let classification = classifier.classify(&Failure::default().with_native_code("23505"));

        assert_eq!(classifier.rules().len(), 4);
        assert_eq!(classification.status, StatusCode::BAD_REQUEST);
        assert_eq!(classification.rule.as_deref(), Some("postgres_unique"));
    }

    #[test]
    fn prepended_rule_overrides_defaults() {
        let classifier = Classifier::builder()
            .with_default_rules()
            .prepend(Rule::new(
                "conflict_is_409",
                Matcher::Kind(FailureKind::UniquenessConflict),
                StatusCode::CONFLICT,
                Transform::Passthrough,
            ))
            .build();

        let classification = classifier.classify(&Failure::uniqueness_conflict().with_message("name taken"));

        assert_eq!(classification.status, StatusCode::CONFLICT);
        assert_eq!(classification.message, single("name taken"));
    }

    #[test]
    fn empty_classifier_only_falls_back() {
        let classifier = Classifier::builder().build();
        let classification = classifier.classify(&Failure::invalid_reference());
        assert_eq!(classification.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classification.message, single(SERVER_ERROR));
    }
}
