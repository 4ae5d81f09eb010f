// src/cfg/config.rs

use eyre::{eyre, Result};
use log::{debug, error};
use secure_string::SecureString;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::cfg::secure;

/// Optional YAML configuration. Every key may be omitted; command-line
/// flags and environment variables take precedence over these values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub server: Option<String>,

    pub port: Option<u16>,

    pub tls: Option<bool>,

    #[serde(alias = "username")]
    pub user: Option<String>,

    #[serde(alias = "password", default, deserialize_with = "secure::deserialize_opt")]
    pub pass: Option<SecureString>,

    #[serde(alias = "mailbox")]
    pub folder: Option<String>,

    #[serde(alias = "cycles")]
    pub cycle: Option<u32>,

    pub csv: Option<bool>,

    pub readwrite: Option<bool>,

    pub subject_term: Option<String>,

    pub body_term: Option<String>,

    /// FETCH items for the per-message and full range fetches.
    pub full_items: Option<Vec<String>>,

    /// FETCH items for the header-only range fetch.
    pub header_items: Option<Vec<String>>,
}

pub fn load_config(config_path: &Path) -> Result<Config> {
    debug!("Loading configuration from {:?}", config_path);

    let content = fs::read_to_string(config_path).map_err(|e| {
        error!("Failed to read config file {}: {}", config_path.display(), e);
        eyre!("Failed to read config file {}: {}", config_path.display(), e)
    })?;

    let cfg = parse_config(&content)?;
    debug!("Successfully loaded configuration");
    Ok(cfg)
}

pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content).map_err(|e| {
        error!("Failed to parse YAML: {}", e);
        eyre!("Failed to parse YAML: {}", e)
    })
}
