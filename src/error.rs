//! # Error Types
//!
//! Error handling for every stage of the bundle pipeline.
//!
//! This module defines all error variants that can occur while framing,
//! transforming, serializing and reading bundles, from low-level I/O errors
//! to authentication failures.
//!
//! ## Error Categories
//! - **Format**: the bytes are not a bundle, or not one this crate can read
//! - **Integrity**: declared length or CRC-32 does not match the payload
//! - **Crypto**: AEAD authentication failed or the key cannot be used
//! - **Serialize**: the asset map or compressed stream is malformed
//! - **Asset**: a named asset is missing or its development file is unreadable
//!
//! Every error is returned synchronously; nothing is retried internally.
//!
//! ## Example Usage
//! ```rust
//! use asset_bundle::error::{BundleError, ErrorCategory};
//!
//! let err = BundleError::ChecksumMismatch { declared: 1, actual: 2 };
//! assert_eq!(err.category(), ErrorCategory::Integrity);
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Integrity errors
    pub const ERR_LENGTH_MISMATCH: &str = "Wrong data size, file may be incomplete";
    pub const ERR_CHECKSUM_MISMATCH: &str = "Wrong checksum, file may be corrupted";

    /// Cryptographic errors
    pub const ERR_AUTHENTICATION_FAILED: &str = "Authentication failed";
    pub const ERR_NONCE_GENERATION: &str = "Failed to gather nonce entropy";

    /// Asset errors
    pub const ERR_ASSET_PATH_UTF8: &str = "Development asset path is not valid UTF-8";
    pub const ERR_ASSET_NAME_UNSAFE: &str = "Asset name is not a plain file name";
}

/// Coarse classification of a [`BundleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Not a recognized bundle, or an incompatible version
    Format,
    /// Truncated or corrupted payload
    Integrity,
    /// Wrong key, tampering, or unusable key material
    Crypto,
    /// Malformed payload structure
    Serialize,
    /// Missing asset or unreadable development file
    Asset,
    /// Invalid configuration
    Config,
    /// File system failure outside asset access
    Io,
}

// BundleError is the primary error type for all bundle operations
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a bundle file")]
    NotABundle,

    #[error("Bundle header is truncated: {0} bytes")]
    TruncatedHeader(usize),

    #[error("Unsupported bundle version: {0}")]
    UnsupportedVersion(u8),

    #[error("Unknown bundle flag: {0}")]
    UnknownFlag(u8),

    #[error("Payload too large: {0} bytes")]
    OversizedPayload(u64),

    #[error("Wrong data size, file may be incomplete (declared {declared}, found {actual})")]
    LengthMismatch { declared: u64, actual: u64 },

    #[error("Wrong checksum, file may be corrupted (declared {declared:#010x}, computed {actual:#010x})")]
    ChecksumMismatch { declared: u32, actual: u32 },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Encryption failed")]
    EncryptionFailure,

    #[error("Invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("Compression failed")]
    CompressionFailure,

    #[error("Decompression failed")]
    DecompressionFailure,

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Deserialize error: {0}")]
    DeserializeError(String),

    #[error("Asset {0} does not exist")]
    AssetNotFound(String),

    #[error("Asset {name} could not be read from {}: {source}", .path.display())]
    AssetUnreadable {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BundleError {
    /// Classify this error into the bundle error taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BundleError::NotABundle
            | BundleError::TruncatedHeader(_)
            | BundleError::UnsupportedVersion(_)
            | BundleError::UnknownFlag(_)
            | BundleError::OversizedPayload(_) => ErrorCategory::Format,
            BundleError::LengthMismatch { .. } | BundleError::ChecksumMismatch { .. } => {
                ErrorCategory::Integrity
            }
            BundleError::AuthenticationFailed
            | BundleError::EncryptionFailure
            | BundleError::InvalidKeyLength(_) => ErrorCategory::Crypto,
            BundleError::CompressionFailure
            | BundleError::DecompressionFailure
            | BundleError::SerializeError(_)
            | BundleError::DeserializeError(_) => ErrorCategory::Serialize,
            BundleError::AssetNotFound(_) | BundleError::AssetUnreadable { .. } => {
                ErrorCategory::Asset
            }
            BundleError::ConfigError(_) => ErrorCategory::Config,
            BundleError::Io(_) => ErrorCategory::Io,
        }
    }

    /// True for both "not found" and "development file unreadable".
    pub fn is_asset_error(&self) -> bool {
        self.category() == ErrorCategory::Asset
    }
}

/// Type alias for Results using BundleError
pub type Result<T> = std::result::Result<T, BundleError>;
