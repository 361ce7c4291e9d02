//! Configuration system for csuite-onboard
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (CSUITE_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::scoring::Originality;
use crate::selection::{RandomnessLevel, DEFAULT_BEAM_WIDTH};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Team selection defaults
    pub selection: SelectionSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Report output
    pub output: OutputSettings,
}

/// Team selection defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Assignments kept after each beam step
    pub beam_width: usize,

    /// low, medium or high
    pub randomness_level: String,

    /// subtle, balanced or bold
    pub originality: String,

    /// Persona catalog file (bundled catalog when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    /// Default seed label (auto-generated per run when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// How often the log file rolls over: hourly, daily, never
    pub rotation: String,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// table or json
    pub format: String,

    /// Print the per-role score terms under the table
    pub show_breakdown: bool,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            randomness_level: RandomnessLevel::default().to_string(),
            originality: Originality::default().to_string(),
            library: None,
            seed: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            rotation: "daily".to_string(),
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            show_breakdown: true,
        }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_OUTPUT_FORMATS: [&str; 2] = ["table", "json"];
const VALID_ROTATIONS: [&str; 3] = ["hourly", "daily", "never"];

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse one file without overrides or validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            Some(PathBuf::from("csuite-onboard.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("csuite").join("onboard.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".csuite").join("onboard.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Selection settings
        if let Ok(val) = std::env::var("CSUITE_BEAM_WIDTH") {
            if let Ok(n) = val.parse() {
                self.selection.beam_width = n;
            }
        }
        if let Ok(val) = std::env::var("CSUITE_RANDOMNESS") {
            self.selection.randomness_level = val;
        }
        if let Ok(val) = std::env::var("CSUITE_ORIGINALITY") {
            self.selection.originality = val;
        }
        if let Ok(val) = std::env::var("CSUITE_LIBRARY") {
            self.selection.library = Some(val);
        }
        if let Ok(val) = std::env::var("CSUITE_SEED") {
            self.selection.seed = Some(val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("CSUITE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("CSUITE_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("CSUITE_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        // Output settings
        if let Ok(val) = std::env::var("CSUITE_OUTPUT_FORMAT") {
            self.output.format = val;
        }
        if let Ok(val) = std::env::var("CSUITE_SHOW_BREAKDOWN") {
            self.output.show_breakdown = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref library) = self.selection.library {
            self.selection.library = Some(expand_path(library));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.selection.beam_width == 0 {
            return Err(Error::config_field_invalid(
                "selection.beam_width",
                "beam_width must be at least 1",
            ));
        }

        if self.selection.randomness_level.parse::<RandomnessLevel>().is_err() {
            return Err(Error::config_field_invalid(
                "selection.randomness_level",
                format!(
                    "Invalid randomness level '{}'. Must be one of: low, medium, high",
                    self.selection.randomness_level
                ),
            ));
        }

        if self.selection.originality.parse::<Originality>().is_err() {
            return Err(Error::config_field_invalid(
                "selection.originality",
                format!(
                    "Invalid originality '{}'. Must be one of: subtle, balanced, bold",
                    self.selection.originality
                ),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !VALID_ROTATIONS.contains(&self.logging.rotation.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.rotation",
                format!(
                    "Invalid rotation '{}'. Must be one of: {}",
                    self.logging.rotation,
                    VALID_ROTATIONS.join(", ")
                ),
            ));
        }

        if !VALID_OUTPUT_FORMATS.contains(&self.output.format.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "output.format",
                format!(
                    "Invalid output format '{}'. Must be one of: {}",
                    self.output.format,
                    VALID_OUTPUT_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Configured randomness level (validated on load)
    pub fn randomness_level(&self) -> Result<RandomnessLevel> {
        self.selection.randomness_level.parse()
    }

    /// Configured originality (validated on load)
    pub fn originality(&self) -> Result<Originality> {
        self.selection.originality.parse()
    }

    /// Persona catalog path, if one is configured
    pub fn library_path(&self) -> Option<PathBuf> {
        self.selection.library.as_ref().map(PathBuf::from)
    }

    pub fn wants_json(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("json")
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".csuite")
                .join("onboard.toml")
        });

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
pub fn generate_default_config() -> String {
    r#"# csuite-onboard configuration

[selection]
# Assignments kept after each beam step
beam_width = 8

# Controlled variety: low (always the top team), medium, high
randomness_level = "medium"

# How far the CEO may stray from the best human match: subtle, balanced, bold
originality = "balanced"

# Alternative persona catalog (comment out to use the bundled one)
# library = "~/.csuite/personas.toml"

# Fixed seed label for reproducible runs (comment out for fresh variety)
# seed = "board-2024"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.csuite/logs/onboard.log"

# Start a new log file: hourly, daily or never
rotation = "daily"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[output]
# table or json
format = "table"

# Print per-role score terms under the table
show_breakdown = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.selection.beam_width, 8);
        assert_eq!(config.selection.randomness_level, "medium");
        assert_eq!(config.selection.originality, "balanced");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.format, "table");
        assert!(config.output.show_breakdown);
    }

    #[test]
    fn test_env_override() {
        env::set_var("CSUITE_BEAM_WIDTH", "3");
        env::set_var("CSUITE_RANDOMNESS", "high");
        env::set_var("CSUITE_SHOW_BREAKDOWN", "0");

        let mut config = AppConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.selection.beam_width, 3);
        assert_eq!(config.selection.randomness_level, "high");
        assert!(!config.output.show_breakdown);

        // Cleanup
        env::remove_var("CSUITE_BEAM_WIDTH");
        env::remove_var("CSUITE_RANDOMNESS");
        env::remove_var("CSUITE_SHOW_BREAKDOWN");
    }

    #[test]
    fn test_validation_zero_beam_width() {
        let mut config = AppConfig::default();
        config.selection.beam_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_randomness() {
        let mut config = AppConfig::default();
        config.selection.randomness_level = "chaotic".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_originality() {
        let mut config = AppConfig::default();
        config.selection.originality = "wild".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rotation() {
        let mut config = AppConfig::default();
        config.logging.rotation = "Hourly".to_string();
        assert!(config.validate().is_ok());

        config.logging.rotation = "weekly".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weekly"));
    }

    #[test]
    fn test_validation_invalid_output_format() {
        let mut config = AppConfig::default();
        config.output.format = "csv".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.randomness_level().unwrap(), RandomnessLevel::Medium);
        assert_eq!(config.originality().unwrap(), Originality::Balanced);
    }

    #[test]
    fn test_path_expansion() {
        let mut config = AppConfig::default();
        config.selection.library = Some("~/catalogs/personas.toml".to_string());
        config.expand_paths();

        // Should not contain ~
        assert!(!config.selection.library.unwrap().contains('~'));
    }

    #[test]
    fn test_generated_default_parses_and_validates() {
        let config: AppConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.selection.beam_width, 8);
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[selection]
beam_width = 12
randomness_level = "low"
seed = "fixed"

[output]
format = "json"
"#;

        let config: AppConfig = toml::from_str(config_str).unwrap();

        assert_eq!(config.selection.beam_width, 12);
        assert_eq!(config.selection.randomness_level, "low");
        assert_eq!(config.selection.seed.as_deref(), Some("fixed"));
        assert_eq!(config.selection.originality, "balanced");
        assert!(config.wants_json());
        assert_eq!(config.logging.level, "info");
    }
}
