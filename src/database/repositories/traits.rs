//! Repository traits
//!
//! Services depend on these traits rather than on SeaORM directly, so a store
//! can be swapped (or mocked in tests) without touching business logic.

use crate::errors::RepositoryResult;
use crate::models::{BlendEntry, Recipe};

/// Append-only store of logged blends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BlendLogStore: Send + Sync {
    /// Every logged blend, in insertion order
    async fn list_all(&self) -> RepositoryResult<Vec<BlendEntry>>;

    /// Persist a new entry.
    ///
    /// Fails with `RepositoryError::ConstraintViolation` when an equivalent
    /// blend is already stored.
    async fn append(&self, recipe: &Recipe) -> RepositoryResult<BlendEntry>;

    async fn find_by_recipe_key(&self, recipe_key: &str) -> RepositoryResult<Option<BlendEntry>>;

    async fn count(&self) -> RepositoryResult<u64>;
}
