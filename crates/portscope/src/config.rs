//! Configuration management for portscope.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "portscope";

/// Environment variable prefix.
const ENV_PREFIX: &str = "PORTSCOPE_";

/// Houston port coordinates (approximate).
pub const HOUSTON_PORT: (f64, f64) = (29.6081, -95.0218);

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PORTSCOPE_`, sections split by `__`)
/// 2. TOML config file at `~/.config/portscope/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record generation configuration.
    pub generator: GeneratorConfig,
    /// Dashboard view configuration.
    pub dashboard: DashboardConfig,
}

/// Record generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of shipments in each batch.
    pub batch_size: usize,
    /// Seed for the random source. A fresh seed is drawn when unset.
    pub seed: Option<u64>,
    /// Latitude vessels are scattered around.
    pub reference_lat: f64,
    /// Longitude vessels are scattered around.
    pub reference_lon: f64,
    /// Maximum offset from the reference point, in degrees, on each axis.
    pub jitter_degrees: f64,
}

/// Dashboard view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of delayed shipments listed under recent delays.
    pub recent_delays_limit: usize,
    /// Number of ETA dates averaged in the delay trend.
    pub trend_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: 15,
            seed: None,
            reference_lat: HOUSTON_PORT.0,
            reference_lon: HOUSTON_PORT.1,
            jitter_degrees: 2.0,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_delays_limit: 5,
            trend_window: 3,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let generator = &self.generator;

        if !generator.reference_lat.is_finite() || generator.reference_lat.abs() > 90.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "reference_lat ({}) must be between -90 and 90",
                    generator.reference_lat
                ),
            });
        }

        if !generator.reference_lon.is_finite() || generator.reference_lon.abs() > 180.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "reference_lon ({}) must be between -180 and 180",
                    generator.reference_lon
                ),
            });
        }

        if !generator.jitter_degrees.is_finite() || generator.jitter_degrees < 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "jitter_degrees ({}) must be a non-negative number",
                    generator.jitter_degrees
                ),
            });
        }

        if self.dashboard.trend_window == 0 {
            return Err(Error::ConfigValidation {
                message: "trend_window must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
