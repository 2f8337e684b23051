use std::path::Path;

use anyhow::Context;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use vx_cipher::{Base64Variant, CipherCodec, HARD_MAX_ENCODED_LEN};

/// Default YAML file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "vx-cipher.yaml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Tool configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. vx-cipher.yaml (or the file passed with --config), if it exists
/// 3. Environment variables with VX_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Text alphabet for envelopes: `standard` (padded base64) or
    /// `url_safe` (unpadded base64url). Both ends must agree.
    #[serde(default)]
    pub variant: Base64Variant,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Longest envelope text accepted or produced, in characters.
    #[serde(default = "default_max_encoded_len")]
    pub max_encoded_len: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

// Cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_max_encoded_len() -> usize {
    vx_cipher::DEFAULT_MAX_ENCODED_LEN
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_encoded_len: default_max_encoded_len(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: default_log_level(),
            },
            codec: CodecConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from defaults, `vx-cipher.yaml` and the environment.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("VX_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the `--config` path when one was given, which must exist,
    /// otherwise from the default file if present.
    ///
    /// # Errors
    /// Returns an error if an explicit file is missing, or loading fails. The
    /// underlying [`ConfigError`] stays in the error chain.
    pub fn resolve(explicit: Option<&str>) -> anyhow::Result<Self> {
        let loaded = match explicit {
            Some(path) => {
                anyhow::ensure!(Path::new(path).is_file(), "config file not found: {path}");
                Self::load_from(path)
            }
            None => Self::load(),
        };
        loaded.context("failed to load configuration")
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {}, got: '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if self.limits.max_encoded_len == 0 {
            return Err(ConfigError::Validation(
                "limits.max_encoded_len cannot be 0".into(),
            ));
        }

        if self.limits.max_encoded_len > HARD_MAX_ENCODED_LEN {
            return Err(ConfigError::Validation(format!(
                "limits.max_encoded_len cannot exceed {HARD_MAX_ENCODED_LEN}, got: {}",
                self.limits.max_encoded_len
            )));
        }

        Ok(())
    }

    /// Envelope codec described by this configuration.
    #[must_use]
    pub fn codec(&self) -> CipherCodec {
        CipherCodec::base64(self.codec.variant).with_max_encoded_len(self.limits.max_encoded_len)
    }
}
