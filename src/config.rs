use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct FinderConfig {
    /// Base URL of the catalog API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Where the favorites record lives
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

/// Location of the durable favorites record
#[derive(Debug, Deserialize, Clone)]
pub struct FavoritesConfig {
    /// Directory holding the record
    #[serde(default = "default_favorites_dir")]
    pub dir: PathBuf,
    /// Record name; the file is `<dir>/<key>.json`
    #[serde(default = "default_favorites_key")]
    pub key: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            dir: default_favorites_dir(),
            key: default_favorites_key(),
        }
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            favorites: FavoritesConfig::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_favorites_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_favorites_key() -> String {
    "foodfinder-favorites".to_string()
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the source priority.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with MEALFINDER__ prefix
/// 2. mealfinder.toml file in current directory
/// 3. Default values
///
/// Environment variable format: MEALFINDER__FAVORITES__DIR
pub fn load_config() -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("mealfinder").required(false))
        // Use double underscore for nested: MEALFINDER__FAVORITES__KEY
        .add_source(
            Environment::with_prefix("MEALFINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
