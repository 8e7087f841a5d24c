use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable overriding `kma.service_key`
pub const SERVICE_KEY_ENV: &str = "NALSSI_SERVICE_KEY";

const APP_DIR: &str = "nalssi";
const MAX_ROWS_PER_PAGE: u32 = 1000;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Forecast API settings
    #[serde(default)]
    pub kma: KmaConfig,

    /// Static tables and local state
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KmaConfig {
    /// Forecast API host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Decoded data.go.kr service key. Can also be set through
    /// `NALSSI_SERVICE_KEY`, which takes precedence.
    #[serde(default)]
    pub service_key: String,

    /// Rows requested per forecast call
    #[serde(default = "default_num_of_rows")]
    pub num_of_rows: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://apis.data.go.kr".to_string()
}

fn default_num_of_rows() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for KmaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            service_key: String::new(),
            num_of_rows: default_num_of_rows(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON table of `{city, gu, dong, nx, ny}` rows
    #[serde(default = "default_regions_path")]
    pub regions_path: PathBuf,

    /// JSON array of `시-구-동` district paths
    #[serde(default = "default_districts_path")]
    pub districts_path: PathBuf,

    /// Directory holding `favorites.json`
    #[serde(default = "default_favorites_dir")]
    pub favorites_dir: PathBuf,
}

fn default_regions_path() -> PathBuf {
    PathBuf::from("data/regions.json")
}

fn default_districts_path() -> PathBuf {
    PathBuf::from("data/korea_districts.json")
}

fn default_favorites_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            regions_path: default_regions_path(),
            districts_path: default_districts_path(),
            favorites_dir: default_favorites_dir(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it with
    /// defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            config
        };

        config.apply_env(std::env::var(SERVICE_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_env(&mut self, service_key: Option<String>) {
        if let Some(key) = service_key.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using service key from {}", SERVICE_KEY_ENV);
            self.kma.service_key = key;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.kma.base_url, "kma.base_url", &mut result);

        if self.kma.service_key.trim().is_empty() {
            result.add_warning(
                "kma.service_key",
                format!("Service key not set (config or {SERVICE_KEY_ENV}); forecasts are unavailable"),
            );
        }

        if self.kma.num_of_rows == 0 {
            result.add_error("kma.num_of_rows", "Must be greater than 0");
        } else if self.kma.num_of_rows > MAX_ROWS_PER_PAGE {
            result.add_warning(
                "kma.num_of_rows",
                format!("More than {MAX_ROWS_PER_PAGE} rows per page may be rejected"),
            );
        }

        if self.kma.timeout_secs == 0 {
            result.add_error("kma.timeout_secs", "Timeout must be greater than 0");
        } else if self.kma.timeout_secs > 120 {
            result.add_warning("kma.timeout_secs", "Timeout is unusually long (>120s)");
        }

        for (field, path) in [
            ("data.regions_path", &self.data.regions_path),
            ("data.districts_path", &self.data.districts_path),
        ] {
            if !path.exists() {
                result.add_warning(field, format!("File does not exist: {}", path.display()));
            } else if !path.is_file() {
                result.add_error(field, format!("Not a file: {}", path.display()));
            }
        }

        if self.data.favorites_dir.is_file() {
            result.add_error(
                "data.favorites_dir",
                format!("Not a directory: {}", self.data.favorites_dir.display()),
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the default configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}
