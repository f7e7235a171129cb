//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search API request settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Harvest loop settings
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Pseudonymization file locations
    #[serde(default)]
    pub pseudonymize: PseudonymizeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override the harvest input/output paths when values are given.
    pub fn apply_path_overrides(&mut self, input: Option<String>, output: Option<String>) {
        if let Some(path) = input.filter(|p| !p.trim().is_empty()) {
            self.harvest.input_path = PathBuf::from(path);
        }
        if let Some(path) = output.filter(|p| !p.trim().is_empty()) {
            self.harvest.output_path = PathBuf::from(path);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.search.endpoint.trim().is_empty() {
            return Err(AppError::validation("search.endpoint is empty"));
        }
        if self.search.timeout_secs == 0 {
            return Err(AppError::validation("search.timeout_secs must be > 0"));
        }
        if self.search.results_per_query == 0 {
            return Err(AppError::validation(
                "search.results_per_query must be > 0",
            ));
        }
        if self.harvest.batch_size == 0 {
            return Err(AppError::validation("harvest.batch_size must be > 0"));
        }
        if self.pseudonymize.sample_size == 0 {
            return Err(AppError::validation(
                "pseudonymize.sample_size must be > 0",
            ));
        }
        if self.pseudonymize.id_prefix.trim().is_empty() {
            return Err(AppError::validation("pseudonymize.id_prefix is empty"));
        }
        Ok(())
    }
}

/// Search API request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Custom Search JSON API endpoint
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Value of the `num` parameter; only the total count is read
    #[serde(default = "defaults::results_per_query")]
    pub results_per_query: u32,

    /// Only pages indexed before this date are counted
    #[serde(default = "defaults::cutoff_date")]
    pub cutoff_date: NaiveDate,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            timeout_secs: defaults::timeout(),
            results_per_query: defaults::results_per_query(),
            cutoff_date: defaults::cutoff_date(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Harvest loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// CSV with `archive_url` and `nif` or `nif_anon`
    #[serde(default = "defaults::input_path")]
    pub input_path: PathBuf,

    /// Append-only results CSV
    #[serde(default = "defaults::output_path")]
    pub output_path: PathBuf,

    /// Results buffered before each append
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Delay after every search request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            input_path: defaults::input_path(),
            output_path: defaults::output_path(),
            batch_size: defaults::batch_size(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Pseudonymization settings. Not overridable from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudonymizeConfig {
    /// Private table with real `nif` values
    #[serde(default = "defaults::private_input")]
    pub private_input: PathBuf,

    /// Private `nif` <-> `nif_anon` key
    #[serde(default = "defaults::private_key_output")]
    pub private_key_output: PathBuf,

    /// Public sample with surrogate IDs only
    #[serde(default = "defaults::public_output")]
    pub public_output: PathBuf,

    /// Rows kept in the public sample
    #[serde(default = "defaults::sample_size")]
    pub sample_size: usize,

    /// Prefix of generated surrogate IDs
    #[serde(default = "defaults::id_prefix")]
    pub id_prefix: String,
}

impl Default for PseudonymizeConfig {
    fn default() -> Self {
        Self {
            private_input: defaults::private_input(),
            private_key_output: defaults::private_key_output(),
            public_output: defaults::public_output(),
            sample_size: defaults::sample_size(),
            id_prefix: defaults::id_prefix(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    // Search defaults
    pub fn endpoint() -> String {
        "https://customsearch.googleapis.com/customsearch/v1".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn results_per_query() -> u32 {
        1
    }
    pub fn cutoff_date() -> NaiveDate {
        // GDPR enforcement date
        NaiveDate::from_ymd_opt(2018, 5, 25).unwrap_or(NaiveDate::MIN)
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; serc-harvest/0.1)".into()
    }

    // Harvest defaults
    pub fn input_path() -> PathBuf {
        PathBuf::from("data/sample_data.csv")
    }
    pub fn output_path() -> PathBuf {
        PathBuf::from("serc_multilingual_results.csv")
    }
    pub fn batch_size() -> usize {
        20
    }
    pub fn request_delay() -> u64 {
        200
    }

    // Pseudonymization defaults
    pub fn private_input() -> PathBuf {
        PathBuf::from("private/nif_url_map.csv")
    }
    pub fn private_key_output() -> PathBuf {
        PathBuf::from("private/private_key.csv")
    }
    pub fn public_output() -> PathBuf {
        PathBuf::from("data/sample_data.csv")
    }
    pub fn sample_size() -> usize {
        50
    }
    pub fn id_prefix() -> String {
        "FIRM".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_values_match_harvest_contract() {
        let config = Config::default();
        assert_eq!(config.search.timeout_secs, 15);
        assert_eq!(config.search.results_per_query, 1);
        assert_eq!(config.search.cutoff_date.to_string(), "2018-05-25");
        assert_eq!(config.harvest.batch_size, 20);
        assert_eq!(config.harvest.request_delay_ms, 200);
        assert_eq!(
            config.harvest.input_path,
            PathBuf::from("data/sample_data.csv")
        );
        assert_eq!(
            config.harvest.output_path,
            PathBuf::from("serc_multilingual_results.csv")
        );
    }

    #[test]
    fn validate_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.harvest.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.search.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [harvest]
            batch_size = 5

            [search]
            cutoff_date = "2019-01-01"
            "#,
        )
        .unwrap();

        assert_eq!(config.harvest.batch_size, 5);
        assert_eq!(config.harvest.request_delay_ms, 200);
        assert_eq!(config.search.cutoff_date.to_string(), "2019-01-01");
        assert_eq!(config.pseudonymize.sample_size, 50);
    }

    #[test]
    fn path_overrides_ignore_blank_values() {
        let mut config = Config::default();
        config.apply_path_overrides(Some("in.csv".into()), Some("  ".into()));
        assert_eq!(config.harvest.input_path, PathBuf::from("in.csv"));
        assert_eq!(
            config.harvest.output_path,
            PathBuf::from("serc_multilingual_results.csv")
        );
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.harvest.batch_size, 20);
    }
}
