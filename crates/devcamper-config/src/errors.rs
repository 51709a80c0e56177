use devcamper_pipeline::{Classifier, Rule};
use serde::Deserialize;

/// Failure classification settings
///
/// ```toml
/// [[errors.rules]]
/// name = "postgres_unique"
/// code = "23505"
/// status = 400
/// message = "duplicate field value entered"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorsConfig {
    /// Rules evaluated after the built-in ones, in file order
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl ErrorsConfig {
    /// Build a classifier from the built-in rules followed by the configured ones
    pub fn classifier(&self) -> Classifier {
        Classifier::builder()
            .with_default_rules()
            .rules(self.rules.iter().cloned())
            .build()
    }
}
