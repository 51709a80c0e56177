//! Failure classification and response normalization
//!
//! [`Classifier`] maps any [`Failure`](devcamper_core::Failure) to a status
//! and message through an ordered rule table. [`Pipeline`] wraps the result
//! in the failure envelope and guarantees one response per request through a
//! [`ResponseSlot`].

#![allow(clippy::must_use_candidate)]

mod classifier;
mod error;
mod pipeline;
pub mod rule;
mod slot;

pub use classifier::{Classification, Classifier, ClassifierBuilder};
pub use error::RuleError;
pub use pipeline::{Delivery, Pipeline};
pub use rule::{Matcher, Rule, Transform};
pub use slot::{ResponseSlot, SlotState};
