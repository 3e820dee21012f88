//! # Configuration Management
//!
//! Centralized configuration for the bundle codec and builder.
//!
//! This module provides the wire-format constants and a structured configuration
//! value that replaces ambient process state: codec settings, builder settings
//! (output path, key, development mode) and logging options.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Security Considerations
//! - The key is stored as configured text and expanded by key padding at encode time;
//!   that expansion adds no entropy
//! - Keys of 32 bytes or more pad past the largest AES key size and are rejected

use crate::core::header::BundleKind;
use crate::core::serialization::SerializationFormat;
use crate::error::{BundleError, Result};
use crate::utils::crypto::pad_key;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Current supported bundle format version
pub const FORMAT_VERSION: u8 = 1;

/// Magic bytes identifying a bundle file
pub const MAGIC_BYTES: [u8; 2] = [0x03, 0x0E];

/// Size of the fixed header: magic(2) + version(1) + flag(1) + checksum(4) + length(8)
pub const HEADER_SIZE: usize = 16;

/// Size of the AEAD nonce stored in front of encrypted payloads
pub const NONCE_SIZE: usize = 12;

/// Default ceiling for wire payloads and decompressed output (1 GiB)
pub const MAX_PAYLOAD_SIZE: u64 = 1024 * 1024 * 1024;

/// Default gzip compression level
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Default output file for the builder
pub const DEFAULT_OUTPUT: &str = "assets.bundle";

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BundleConfig {
    /// Encode/decode settings
    #[serde(default)]
    pub codec: CodecConfig,

    /// Directory builder settings
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BundleConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| BundleError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BundleError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| BundleError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Unparseable values are reported instead of silently falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(output) = std::env::var("ASSET_BUNDLE_OUTPUT") {
            config.builder.output = PathBuf::from(output);
        }

        if let Ok(key) = std::env::var("ASSET_BUNDLE_KEY") {
            config.builder.key = Some(key);
        }

        if let Ok(dev) = std::env::var("ASSET_BUNDLE_DEVELOPMENT") {
            config.builder.development = parse_bool("ASSET_BUNDLE_DEVELOPMENT", &dev)?;
        }

        if let Ok(mode) = std::env::var("ASSET_BUNDLE_MODE") {
            config.codec.mode = mode.parse()?;
        }

        if let Ok(format) = std::env::var("ASSET_BUNDLE_FORMAT") {
            config.codec.serialization = format.parse()?;
        }

        if let Ok(level) = std::env::var("ASSET_BUNDLE_COMPRESSION_LEVEL") {
            config.codec.compression_level = level.parse::<u32>().map_err(|e| {
                BundleError::ConfigError(format!("Invalid ASSET_BUNDLE_COMPRESSION_LEVEL: {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("ASSET_BUNDLE_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                BundleError::ConfigError(format!("Invalid ASSET_BUNDLE_LOG_LEVEL: {level}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BundleError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| BundleError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.builder.validate_with(&self.codec);
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BundleError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(BundleError::ConfigError(format!(
            "Invalid {var}: '{other}' (expected true/false)"
        ))),
    }
}

/// Encode/decode settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Transform pipeline used when encoding
    pub mode: BundleKind,

    /// Engine used to flatten the asset map
    pub serialization: SerializationFormat,

    /// gzip level (0-9)
    pub compression_level: u32,

    /// Largest payload accepted on decode, before and after decompression
    pub max_payload_size: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            mode: BundleKind::Compressed,
            serialization: SerializationFormat::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.compression_level > 9 {
            errors.push(format!(
                "Invalid compression level: {} (valid range: 0-9)",
                self.compression_level
            ));
        }

        if self.max_payload_size == 0 {
            errors.push("Max payload size cannot be 0".to_string());
        }

        errors
    }
}

/// Directory builder settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuilderConfig {
    /// Where the bundle is written
    pub output: PathBuf,

    /// Encryption key; when set the bundle is written encrypted
    #[serde(default)]
    pub key: Option<String>,

    /// Store file paths instead of contents
    #[serde(default)]
    pub development: bool,

    /// Skip files and directories whose name starts with '.'
    #[serde(default)]
    pub skip_hidden: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            key: None,
            development: false,
            skip_hidden: false,
        }
    }
}

impl BuilderConfig {
    /// The transform pipeline this configuration writes with under the
    /// default codec settings.
    pub fn mode(&self) -> BundleKind {
        self.mode_or(CodecConfig::default().mode)
    }

    /// The transform pipeline this configuration writes with.
    ///
    /// Development mode and a key take precedence; otherwise `codec_mode` is used.
    pub fn mode_or(&self, codec_mode: BundleKind) -> BundleKind {
        if self.development {
            BundleKind::Development
        } else if self.key.is_some() {
            BundleKind::Encrypted
        } else {
            codec_mode
        }
    }

    /// Validate builder and codec settings together, including whether the
    /// codec mode can be produced by this builder.
    pub fn validate_with(&self, codec: &CodecConfig) -> Vec<String> {
        let mut errors = codec.validate();
        errors.extend(self.validate());

        match self.mode_or(codec.mode) {
            BundleKind::Encrypted if self.key.is_none() => {
                errors.push("Codec mode 'encrypted' requires a builder key".to_string());
            }
            BundleKind::Development if !self.development => {
                errors.push(
                    "Codec mode 'development' requires builder development = true".to_string(),
                );
            }
            _ => {}
        }

        errors
    }

    /// Validate builder configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.output.as_os_str().is_empty() {
            errors.push("Output path cannot be empty".to_string());
        }

        if let Some(ref key) = self.key {
            let padded = pad_key(key.as_bytes()).len();
            if !matches!(padded, 16 | 24 | 32) {
                errors.push(format!(
                    "Key too long: {} bytes pads to {padded} (maximum: 31 bytes)",
                    key.len()
                ));
            }
            if self.development {
                errors.push("Development bundles cannot be encrypted".to_string());
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("asset-bundle"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
