use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::{ScoringWeights, DEFAULT_RADIUS_MILES};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub directory: DirectorySettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_directory_timeout")]
    pub timeout_secs: u64,
}

fn default_directory_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// L1-only caching when unset
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius_miles")]
    pub default_radius_miles: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_miles: default_radius_miles(),
        }
    }
}

fn default_radius_miles() -> f64 { DEFAULT_RADIUS_MILES }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_type_match_weight")]
    pub type_match: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
    #[serde(default = "default_reputation_weight")]
    pub reputation: f64,
    #[serde(default = "default_contact_weight")]
    pub contact: f64,
    #[serde(default = "default_service_needs_weight")]
    pub service_needs: f64,
    #[serde(default = "default_distance_penalty")]
    pub distance_penalty_per_mile: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            distance: default_distance_weight(),
            type_match: default_type_match_weight(),
            availability: default_availability_weight(),
            reputation: default_reputation_weight(),
            contact: default_contact_weight(),
            service_needs: default_service_needs_weight(),
            distance_penalty_per_mile: default_distance_penalty(),
        }
    }
}

impl WeightsConfig {
    /// Every budget must be finite and non-negative; the penalty must be finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budgets = [
            ("distance", self.distance),
            ("type_match", self.type_match),
            ("availability", self.availability),
            ("reputation", self.reputation),
            ("contact", self.contact),
            ("service_needs", self.service_needs),
        ];

        for (name, value) in budgets {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "scoring.weights.{} must be a finite number >= 0, got {}",
                    name, value
                )));
            }
        }

        if !self.distance_penalty_per_mile.is_finite() {
            return Err(ConfigError::Message(format!(
                "scoring.weights.distance_penalty_per_mile must be finite, got {}",
                self.distance_penalty_per_mile
            )));
        }

        Ok(())
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            distance: value.distance,
            type_match: value.type_match,
            availability: value.availability,
            reputation: value.reputation,
            contact: value.contact,
            service_needs: value.service_needs,
            distance_penalty_per_mile: value.distance_penalty_per_mile,
        }
    }
}

fn default_distance_weight() -> f64 { 30.0 }
fn default_type_match_weight() -> f64 { 20.0 }
fn default_availability_weight() -> f64 { 15.0 }
fn default_reputation_weight() -> f64 { 20.0 }
fn default_contact_weight() -> f64 { 15.0 }
fn default_service_needs_weight() -> f64 { 20.0 }
fn default_distance_penalty() -> f64 { 2.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with CARE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., CARE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        Self::from_config(settings)
    }

    /// Deserialize and validate an already-built configuration
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.scoring.weights.validate()?;
        Ok(settings)
    }
}

/// Apply well-known unprefixed environment variables on top of the config
///
/// `DATABASE_URL` and `DIRECTORY_API_KEY` are what deploy tooling usually sets.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("DIRECTORY_API_KEY") {
        builder = builder.set_override("directory.api_key", api_key)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}
