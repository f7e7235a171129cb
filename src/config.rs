// src/config.rs

//! Environment-backed configuration loading.
//!
//! The TOML file holds tunables; the process environment (optionally
//! seeded from a local `.env` file) holds the API secrets and the harvest
//! path overrides.

use std::env;
use std::fmt;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Environment variable holding the search API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Environment variable holding the search-engine (context) ID.
pub const ENGINE_ID_VAR: &str = "SEARCH_ENGINE_ID";
/// Environment variable overriding the harvest input path.
pub const INPUT_PATH_VAR: &str = "INPUT_PATH";
/// Environment variable overriding the harvest output path.
pub const OUTPUT_PATH_VAR: &str = "OUTPUT_PATH";

/// Search API credentials.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub engine_id: String,
}

impl Credentials {
    /// Build credentials from raw values, rejecting missing or blank ones.
    pub fn new(api_key: Option<String>, engine_id: Option<String>) -> Result<Self> {
        let api_key = require(API_KEY_VAR, api_key)?;
        let engine_id = require(ENGINE_ID_VAR, engine_id)?;
        Ok(Self { api_key, engine_id })
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(env::var(API_KEY_VAR).ok(), env::var(ENGINE_ID_VAR).ok())
    }
}

// Keep the key out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

fn require(name: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::config(format!("{name} must be set")))
}

/// Load `.env` if present, then the TOML config with environment path overrides.
pub fn load_config(path: &Path) -> Config {
    if let Ok(env_file) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", env_file.display());
    }

    let mut config = Config::load_or_default(path);
    config.apply_path_overrides(env::var(INPUT_PATH_VAR).ok(), env::var(OUTPUT_PATH_VAR).ok());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_values() {
        assert!(Credentials::new(Some("key".into()), None).is_err());
        assert!(Credentials::new(None, Some("cx".into())).is_err());
        assert!(Credentials::new(Some("key".into()), Some("cx".into())).is_ok());
    }

    #[test]
    fn credentials_reject_blank_values() {
        let err = Credentials::new(Some("   ".into()), Some("cx".into())).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn credentials_debug_hides_key() {
        let creds = Credentials::new(Some("secret-key".into()), Some("cx".into())).unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("cx"));
    }
}
