//! Centralized error handling for the blend log service
//!
//! # Error Categories
//!
//! - **Validation Errors**: malformed blend parameters and request payloads
//! - **Storage Errors**: database and repository failures
//! - **Lookup Errors**: missing records
//!
//! # Usage
//!
//! ```rust
//! use blend_log::errors::{AppError, AppResult};
//!
//! fn parse_amount(raw: &str) -> AppResult<i64> {
//!     raw.parse()
//!         .map_err(|_| AppError::validation(format!("Invalid amount '{raw}'")))
//! }
//!
//! assert!(parse_amount("12").is_ok());
//! assert!(parse_amount("twelve").is_err());
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;
