//! Bundle header framing.
//!
//! The header is a fixed 16-byte frame in front of the payload. All
//! multi-byte fields are big-endian:
//!
//! ```text
//! [Magic(2)] [Version(1)] [Flag(1)] [CRC-32(4)] [Length(8)] [Payload(N)]
//! ```
//!
//! The checksum and length cover the wire payload, i.e. the bytes after
//! compression and encryption. They are verified before anything is
//! decrypted or decompressed.

use crate::config::{FORMAT_VERSION, HEADER_SIZE, MAGIC_BYTES};
use crate::error::{constants, BundleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Which transform pipeline produced a payload.
///
/// The four pipelines are mutually exclusive; encrypted payloads are always
/// compressed first, and development payloads are stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    /// Flattened asset map, no transform
    #[default]
    None,
    /// gzip over the flattened asset map
    Compressed,
    /// AES-GCM over the gzip stream
    Encrypted,
    /// Asset payloads are file paths read on access
    Development,
}

impl BundleKind {
    /// Wire value of the flag byte
    pub fn flag_byte(self) -> u8 {
        match self {
            BundleKind::None => 0,
            BundleKind::Compressed => 1,
            BundleKind::Encrypted => 2,
            BundleKind::Development => 3,
        }
    }

    /// Parse a flag byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(BundleKind::None),
            1 => Some(BundleKind::Compressed),
            2 => Some(BundleKind::Encrypted),
            3 => Some(BundleKind::Development),
            _ => None,
        }
    }

    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            BundleKind::None => "none",
            BundleKind::Compressed => "compressed",
            BundleKind::Encrypted => "encrypted",
            BundleKind::Development => "development",
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BundleKind {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(BundleKind::None),
            "compressed" => Ok(BundleKind::Compressed),
            "encrypted" => Ok(BundleKind::Encrypted),
            "development" | "dev" => Ok(BundleKind::Development),
            other => Err(BundleError::ConfigError(format!(
                "Unknown bundle mode: '{other}'"
            ))),
        }
    }
}

/// CRC-32 (IEEE) of a byte slice
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// The fixed header in front of a bundle payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub kind: BundleKind,
    pub checksum: u32,
    pub length: u64,
}

impl Header {
    /// Compute the header fields for a wire payload
    pub fn for_payload(kind: BundleKind, payload: &[u8]) -> Self {
        Self {
            version: FORMAT_VERSION,
            kind,
            checksum: checksum(payload),
            length: payload.len() as u64,
        }
    }

    /// Serialize the header to its 16-byte wire form
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&MAGIC_BYTES);
        out[2] = self.version;
        out[3] = self.kind.flag_byte();
        out[4..8].copy_from_slice(&self.checksum.to_be_bytes());
        out[8..16].copy_from_slice(&self.length.to_be_bytes());
        out
    }

    /// Parse and gatekeep a header from the front of `data`.
    ///
    /// Checks run in order: magic, size, version, flag. Length and checksum
    /// are checked separately by [`Header::verify`] once the payload is split off.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MAGIC_BYTES.len() || data[0..2] != MAGIC_BYTES {
            return Err(BundleError::NotABundle);
        }

        if data.len() < HEADER_SIZE {
            return Err(BundleError::TruncatedHeader(data.len()));
        }

        let version = data[2];
        if version != FORMAT_VERSION {
            return Err(BundleError::UnsupportedVersion(version));
        }

        let kind = BundleKind::from_byte(data[3]).ok_or(BundleError::UnknownFlag(data[3]))?;

        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&data[4..8]);
        let mut length = [0u8; 8];
        length.copy_from_slice(&data[8..16]);

        Ok(Self {
            version,
            kind,
            checksum: u32::from_be_bytes(checksum),
            length: u64::from_be_bytes(length),
        })
    }

    /// Check the declared length and checksum against the wire payload
    pub fn verify(&self, payload: &[u8]) -> Result<()> {
        let actual_len = payload.len() as u64;
        if actual_len != self.length {
            warn!(
                declared = self.length,
                actual = actual_len,
                "{}",
                constants::ERR_LENGTH_MISMATCH
            );
            return Err(BundleError::LengthMismatch {
                declared: self.length,
                actual: actual_len,
            });
        }

        let actual_sum = checksum(payload);
        if actual_sum != self.checksum {
            warn!(
                declared = self.checksum,
                actual = actual_sum,
                "{}",
                constants::ERR_CHECKSUM_MISMATCH
            );
            return Err(BundleError::ChecksumMismatch {
                declared: self.checksum,
                actual: actual_sum,
            });
        }

        Ok(())
    }
}

/// Frame a wire payload: header bytes followed by the payload.
pub fn frame(kind: BundleKind, payload: &[u8]) -> Vec<u8> {
    let header = Header::for_payload(kind, payload);
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    out
}

/// Split raw bundle bytes into a gatekept header and its verified payload.
pub fn unframe(data: &[u8]) -> Result<(Header, &[u8])> {
    let header = Header::parse(data)?;
    let payload = &data[HEADER_SIZE..];
    header.verify(payload)?;
    Ok((header, payload))
}
