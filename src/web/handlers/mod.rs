//! HTTP handlers organized by domain
//!
//! Handlers stay thin: extract, call a service or repository, map the result.

pub mod blend_log;
pub mod drink_names;
pub mod health;
