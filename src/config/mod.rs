use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub blends: BlendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Blend submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Prefix stripped from each query parameter name to recover the slot index
    /// (`slot3=40` pours 40 from slot 3)
    #[serde(default = "default_slot_prefix")]
    pub slot_prefix: String,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_slot_prefix() -> String {
    DEFAULT_SLOT_PREFIX.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: Some(DEFAULT_MAX_CONNECTIONS),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            slot_prefix: default_slot_prefix(),
        }
    }
}

impl Config {
    /// Layer defaults, the TOML file and `BLEND_LOG_` environment variables.
    ///
    /// A missing file is created with the default settings first.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)
                .with_context(|| format!("Failed to write default config: {config_file}"))?;
            info!("Created default config file: {}", config_file);
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Invalid configuration in {config_file}"))?;

        config.validate()?;
        Ok(config)
    }

    /// Command line values win over every configured layer
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        database_url: Option<String>,
    ) {
        if let Some(host) = host {
            self.web.host = host;
        }
        if let Some(port) = port {
            self.web.port = port;
        }
        if let Some(database_url) = database_url {
            self.database.url = database_url;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.blends.slot_prefix.is_empty() {
            return Err(AppError::configuration("blends.slot_prefix must not be empty"));
        }
        if self.database.max_connections == Some(0) {
            return Err(AppError::configuration(
                "database.max_connections must be at least 1",
            ));
        }
        Ok(())
    }
}
