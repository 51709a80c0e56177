use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Bootcamp, BootcampInput};

/// Storage for bootcamps
///
/// Identifiers arrive as raw path segments; implementations parse them and
/// report malformed ones as [`StoreError::Cast`](crate::StoreError::Cast).
#[async_trait]
pub trait BootcampRepository: Send + Sync {
    /// All bootcamps in insertion order
    async fn list(&self) -> Result<Vec<Bootcamp>>;

    /// One bootcamp by id
    async fn get(&self, id: &str) -> Result<Bootcamp>;

    /// Validate and insert a new bootcamp
    async fn create(&self, input: BootcampInput) -> Result<Bootcamp>;

    /// Merge `patch` into an existing bootcamp and re-validate
    async fn update(&self, id: &str, patch: BootcampInput) -> Result<Bootcamp>;

    /// Remove a bootcamp, returning it
    async fn delete(&self, id: &str) -> Result<Bootcamp>;
}
