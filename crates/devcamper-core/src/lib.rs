//! Failure model shared by every DevCamper crate
//!
//! A [`Failure`] describes why a request could not complete. It is
//! classified once, at the outermost boundary, into an [`Envelope`].

#![allow(clippy::must_use_candidate)]

pub mod envelope;
mod error;
mod failure;

pub use envelope::{Envelope, ErrorMessage, SERVER_ERROR};
pub use error::HttpError;
pub use failure::{Failure, FailureKind, NativeCode, signature};
