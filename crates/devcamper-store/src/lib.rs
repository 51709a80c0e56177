//! Reference persistence adapter for bootcamps
//!
//! Behaves like a document store: malformed ids raise cast errors, the
//! unique `name` index raises duplicate-key errors, and schema validation
//! reports every violated field at once. [`StoreError`] carries those native
//! signals so the failure pipeline can classify them.

#![allow(clippy::must_use_candidate)]

mod error;
mod memory;
mod model;
mod repository;
mod validate;

pub use error::{Result, StoreError};
pub use memory::InMemoryBootcamps;
pub use model::{Bootcamp, BootcampId, BootcampInput, Career, slugify};
pub use repository::BootcampRepository;
pub use validate::{ValidBootcamp, validate};
