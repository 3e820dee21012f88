//! # Serialization Formats
//!
//! Flattening of the in-memory bundle into a self-describing byte stream.
//!
//! Every flattened payload starts with one format byte naming the serde engine
//! that produced the rest, so a reader holding nothing but the blob knows how
//! to decode it. MessagePack with named fields is the default; JSON is useful
//! when inspecting a bundle by hand; bincode is the most compact.
//!
//! ## Wire Format
//! ```text
//! [Format(1)] [Body(N)]
//! ```
//!
//! ## Usage
//! ```ignore
//! use asset_bundle::core::serialization::{MultiFormat, SerializationFormat};
//!
//! let bytes = bundle.serialize_with_header(SerializationFormat::MessagePack)?;
//! let (bundle, format) = Bundle::deserialize_with_header(&bytes)?;
//! ```

use crate::core::bundle::Bundle;
use crate::error::{BundleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationFormat {
    /// Binary compact format
    Bincode,
    /// Human-readable JSON format (debugging, interop)
    Json,
    /// MessagePack with named struct fields (default)
    #[default]
    MessagePack,
}

impl SerializationFormat {
    /// Get the format identifier byte for the payload
    pub fn format_byte(self) -> u8 {
        match self {
            SerializationFormat::Bincode => 0x01,
            SerializationFormat::Json => 0x02,
            SerializationFormat::MessagePack => 0x03,
        }
    }

    /// Detect format from identifier byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(SerializationFormat::Bincode),
            0x02 => Some(SerializationFormat::Json),
            0x03 => Some(SerializationFormat::MessagePack),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "Bincode",
            SerializationFormat::Json => "JSON",
            SerializationFormat::MessagePack => "MessagePack",
        }
    }
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SerializationFormat {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bincode" => Ok(SerializationFormat::Bincode),
            "json" => Ok(SerializationFormat::Json),
            "messagepack" | "msgpack" => Ok(SerializationFormat::MessagePack),
            other => Err(BundleError::ConfigError(format!(
                "Unknown serialization format: '{other}'"
            ))),
        }
    }
}

/// Trait for types that support multiple serialization formats
pub trait MultiFormat: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Serialize to bytes using the specified format
    fn serialize_format(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        match format {
            SerializationFormat::Bincode => {
                bincode::serialize(self).map_err(|e| BundleError::SerializeError(e.to_string()))
            }
            SerializationFormat::Json => {
                serde_json::to_vec(self).map_err(|e| BundleError::SerializeError(e.to_string()))
            }
            SerializationFormat::MessagePack => rmp_serde::to_vec_named(self)
                .map_err(|e| BundleError::SerializeError(e.to_string())),
        }
    }

    /// Serialize to bytes with format header
    fn serialize_with_header(&self, format: SerializationFormat) -> Result<Vec<u8>> {
        let mut data = vec![format.format_byte()];
        let mut payload = self.serialize_format(format)?;
        data.append(&mut payload);
        Ok(data)
    }

    /// Deserialize from bytes using the specified format
    fn deserialize_format(data: &[u8], format: SerializationFormat) -> Result<Self> {
        match format {
            SerializationFormat::Bincode => bincode::deserialize(data)
                .map_err(|e| BundleError::DeserializeError(e.to_string())),
            SerializationFormat::Json => serde_json::from_slice(data)
                .map_err(|e| BundleError::DeserializeError(e.to_string())),
            SerializationFormat::MessagePack => rmp_serde::from_slice(data)
                .map_err(|e| BundleError::DeserializeError(e.to_string())),
        }
    }

    /// Deserialize from bytes with format header
    fn deserialize_with_header(data: &[u8]) -> Result<(Self, SerializationFormat)> {
        if data.is_empty() {
            return Err(BundleError::DeserializeError("Empty data".to_string()));
        }

        let format = SerializationFormat::from_byte(data[0]).ok_or_else(|| {
            BundleError::DeserializeError(format!("Unknown format byte: {}", data[0]))
        })?;

        let value = Self::deserialize_format(&data[1..], format)?;
        Ok((value, format))
    }
}

impl MultiFormat for Bundle {}

/// Flatten a bundle into a self-describing byte stream
pub fn flatten(bundle: &Bundle, format: SerializationFormat) -> Result<Vec<u8>> {
    bundle.serialize_with_header(format)
}

/// Rebuild a bundle from a flattened byte stream
pub fn unflatten(data: &[u8]) -> Result<Bundle> {
    Bundle::deserialize_with_header(data).map(|(bundle, _)| bundle)
}
