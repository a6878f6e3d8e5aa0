//! Configuration management for zcomix page widgets
//!
//! This module handles loading, validation, and management of
//! widget configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Slide show settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideShowConfig {
    /// Delay before the first slide is shown, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub start_delay_ms: u64,
    /// Element ids of the gallery roots to wire up
    #[serde(default = "default_galleries")]
    pub galleries: Vec<String>,
    /// Class marking the dot of the visible slide
    #[serde(default = "default_current_class")]
    pub current_class: String,
}

impl Default for SlideShowConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_delay_ms(),
            galleries: default_galleries(),
            current_class: default_current_class(),
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_galleries() -> Vec<String> {
    vec!["reader_page".to_string()]
}

fn default_current_class() -> String {
    "current".to_string()
}

/// Contribution widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributeConfig {
    /// Text shown next to the amount field when validation fails
    #[serde(default = "default_error_message")]
    pub error_message: String,
}

impl Default for ContributeConfig {
    fn default() -> Self {
        Self {
            error_message: default_error_message(),
        }
    }
}

fn default_error_message() -> String {
    "Invalid amount".to_string()
}

/// Number formatting options for a class of numeric fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSettings {
    /// Digits after the decimal point
    #[serde(default = "default_places")]
    pub places: u32,
    /// Thousands separator, empty disables grouping
    #[serde(default)]
    pub group: String,
    /// Decimal separator
    #[serde(default = "default_point")]
    pub point: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Fallback for non-numeric input. `None` (YAML `null`) echoes the input back.
    #[serde(default = "default_nan")]
    pub nan: Option<String>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            places: default_places(),
            group: String::new(),
            point: default_point(),
            prefix: String::new(),
            suffix: String::new(),
            nan: default_nan(),
        }
    }
}

impl FormatSettings {
    /// Settings with a thousands separator
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    /// Settings with a different fallback for non-numeric input
    pub fn with_nan(mut self, nan: Option<&str>) -> Self {
        self.nan = nan.map(|s| s.to_string());
        self
    }

    /// Check the settings, naming `field` in the error
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.places > 10 {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.places", field),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }
        if self.point.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.point", field),
                reason: "Decimal separator must not be empty".to_string(),
            });
        }
        if !self.group.is_empty() && self.group == self.point {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.group", field),
                reason: "Thousands separator must differ from the decimal separator".to_string(),
            });
        }
        Ok(())
    }
}

fn default_places() -> u32 {
    2
}

fn default_point() -> String {
    ".".to_string()
}

fn default_nan() -> Option<String> {
    Some("0".to_string())
}

/// Presets applied to the numeric field classes of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattingConfig {
    /// Settings for `.currency` fields
    #[serde(default)]
    pub currency: FormatSettings,
    /// Settings for `.currency_or_blank` fields
    #[serde(default = "default_currency_or_blank")]
    pub currency_or_blank: FormatSettings,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            currency: FormatSettings::default(),
            currency_or_blank: default_currency_or_blank(),
        }
    }
}

fn default_currency_or_blank() -> FormatSettings {
    FormatSettings::default().with_nan(Some(""))
}

/// "Not implemented" notices and viewport display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticesConfig {
    /// Delay before notice handlers are attached, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Alert text for unfinished features
    #[serde(default = "default_notice_message")]
    pub message: String,
}

impl Default for NoticesConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            message: default_notice_message(),
        }
    }
}

fn default_notice_message() -> String {
    "This feature is not working yet.".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Slide show settings
    #[serde(default)]
    pub slideshow: SlideShowConfig,
    /// Contribution widget settings
    #[serde(default)]
    pub contribute: ContributeConfig,
    /// Numeric field presets
    #[serde(default)]
    pub formatting: FormattingConfig,
    /// Notice settings
    #[serde(default)]
    pub notices: NoticesConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slideshow.galleries.iter().any(|g| g.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "slideshow.galleries".to_string(),
                reason: "Gallery names must not be empty".to_string(),
            });
        }

        if self.slideshow.current_class.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "slideshow.current_class".to_string(),
                reason: "Current marker class must not be empty".to_string(),
            });
        }

        self.formatting.currency.validate("formatting.currency")?;
        self.formatting.currency_or_blank.validate("formatting.currency_or_blank")?;

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
