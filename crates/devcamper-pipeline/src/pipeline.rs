use std::sync::Arc;

use devcamper_core::{Envelope, Failure};
use http::StatusCode;

use crate::classifier::Classifier;
use crate::slot::{ResponseSlot, SlotState};

/// Outcome of handing a failure to the pipeline for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Write this status and envelope
    Respond {
        /// Resolved status
        status: StatusCode,
        /// Body to write
        envelope: Envelope,
        /// Name of the rule that matched, for operator logs
        rule: Option<String>,
    },
    /// A response was already written for this request
    AlreadySent,
    /// The request was cancelled; write nothing
    Aborted,
}

/// Terminal stage of request processing
///
/// Classifies a failure and wraps the result in an envelope. Holds no
/// mutable state; clones share the same frozen classifier.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    classifier: Arc<Classifier>,
}

impl Pipeline {
    /// Pipeline over the given rule table
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// The rule table in use
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Classify a failure into the status and envelope to write
    pub fn handle(&self, failure: &Failure) -> (StatusCode, Envelope) {
        self.classifier.classify(failure).into_response_parts()
    }

    /// Classify a failure for a request, at most once per slot
    ///
    /// The first delivery on an open slot claims it and yields
    /// [`Delivery::Respond`]. Later deliveries are no-ops.
    pub fn deliver(&self, slot: &ResponseSlot, failure: &Failure) -> Delivery {
        match slot.try_claim() {
            Ok(()) => {
                let classification = self.classifier.classify(failure);
                let rule = classification.rule.clone();
                let (status, envelope) = classification.into_response_parts();
                Delivery::Respond { status, envelope, rule }
            }
            Err(SlotState::Aborted) => Delivery::Aborted,
            Err(_) => Delivery::AlreadySent,
        }
    }
}
