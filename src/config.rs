//! TOML configuration with environment overrides.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [airtable]
//! api_url = "https://api.airtable.com/v0"
//! table = "Relatives"
//! timeout_secs = 30
//! # max_records = 500
//! ```
//!
//! Credentials never live in the file. They are read from the environment
//! when the config is loaded:
//! - `AIRTABLE_API_KEY` — required
//! - `AIRTABLE_BASE_ID` — required
//! - `AIRTABLE_TABLE_NAME` — optional, overrides `airtable.table`

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const ENV_API_KEY: &str = "AIRTABLE_API_KEY";
pub const ENV_BASE_ID: &str = "AIRTABLE_BASE_ID";
pub const ENV_TABLE_NAME: &str = "AIRTABLE_TABLE_NAME";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub airtable: AirtableConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AirtableConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on rows fetched per listing. `None` fetches everything.
    #[serde(default)]
    pub max_records: Option<usize>,
    /// Filled from `AIRTABLE_API_KEY`.
    #[serde(skip)]
    pub api_key: String,
    /// Filled from `AIRTABLE_BASE_ID`.
    #[serde(skip)]
    pub base_id: String,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
            max_records: None,
            api_key: String::new(),
            base_id: String::new(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}
fn default_table() -> String {
    "Relatives".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

/// Loads `path` (if it exists), applies environment overrides, and validates.
pub fn load_config(path: &Path) -> Result<Config> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading overrides through `lookup`.
pub fn load_config_with_env<F>(path: &Path, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str::<Config>(&content).with_context(|| "Failed to parse config file")?
    } else {
        log::info!(
            "config file {} not found, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env(&mut config, lookup);
    validate(&config)?;

    Ok(config)
}

/// Overlays credentials and table name from `lookup` (normally the process
/// environment). Empty values count as unset.
pub fn apply_env<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(ENV_API_KEY) {
        config.airtable.api_key = key;
    }
    if let Some(base) = get(ENV_BASE_ID) {
        config.airtable.base_id = base;
    }
    if let Some(table) = get(ENV_TABLE_NAME) {
        config.airtable.table = table;
    }
}

pub fn validate(config: &Config) -> Result<()> {
    if config.airtable.api_key.is_empty() {
        bail!("{} environment variable not set", ENV_API_KEY);
    }
    if config.airtable.base_id.is_empty() {
        bail!("{} environment variable not set", ENV_BASE_ID);
    }
    if config.airtable.table.trim().is_empty() {
        bail!("airtable.table must not be empty");
    }
    if config.airtable.timeout_secs == 0 {
        bail!("airtable.timeout_secs must be > 0");
    }
    if config.airtable.max_records == Some(0) {
        bail!("airtable.max_records must be >= 1 when set");
    }
    Ok(())
}
