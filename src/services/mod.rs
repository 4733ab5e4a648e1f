//! Service layer
//!
//! Business logic sits here; web handlers stay thin and repositories only
//! talk to the database.

pub mod blend_dedup;

pub use blend_dedup::BlendDedupService;
