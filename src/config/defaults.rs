//! Configuration default values
//!
//! All default values for configuration options live here so they can be
//! changed in one place.

// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/blend-log.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Blend defaults
pub const DEFAULT_SLOT_PREFIX: &str = "slot";

// Environment overrides, e.g. BLEND_LOG_WEB__PORT=9000
pub const ENV_PREFIX: &str = "BLEND_LOG_";
