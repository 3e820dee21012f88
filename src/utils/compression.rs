use crate::config::{DEFAULT_COMPRESSION_LEVEL, MAX_PAYLOAD_SIZE};
use crate::error::{BundleError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// gzip member magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Smallest possible gzip member: 10-byte header, empty deflate block, 8-byte trailer
const GZIP_MIN_LEN: usize = 20;

/// Compresses data into a gzip stream at the default level
///
/// # Errors
/// Returns `BundleError::CompressionFailure` if the encoder fails
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_level(data, DEFAULT_COMPRESSION_LEVEL)
}

/// Compresses data into a gzip stream at the given level (0-9)
///
/// # Errors
/// Returns `BundleError::CompressionFailure` for a level above 9 or if the
/// encoder fails
pub fn compress_with_level(data: &[u8], level: u32) -> Result<Vec<u8>> {
    if level > 9 {
        return Err(BundleError::CompressionFailure);
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|_| BundleError::CompressionFailure)?;
    encoder.finish().map_err(|_| BundleError::CompressionFailure)
}

/// Decompresses a gzip stream, capped at `MAX_PAYLOAD_SIZE` bytes of output
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with_limit(data, MAX_PAYLOAD_SIZE)
}

/// Decompresses a gzip stream, refusing to produce more than `limit` bytes.
///
/// The gzip trailer (CRC-32 and size of the original data) is checked by the
/// decoder, independently of the bundle header checksum.
///
/// # Errors
/// Returns `BundleError::DecompressionFailure` if:
/// - The input does not start with the gzip magic or is too short
/// - The stream is truncated or its trailer does not match
/// - Output size exceeds `limit`
pub fn decompress_with_limit(data: &[u8], limit: u64) -> Result<Vec<u8>> {
    if data.len() < GZIP_MIN_LEN || data[0..2] != GZIP_MAGIC {
        return Err(BundleError::DecompressionFailure);
    }

    let mut out = Vec::new();
    // Read one byte past the limit so an oversized stream is detectable
    let mut reader = GzDecoder::new(data).take(limit.saturating_add(1));
    reader
        .read_to_end(&mut out)
        .map_err(|_| BundleError::DecompressionFailure)?;

    if out.len() as u64 > limit {
        return Err(BundleError::DecompressionFailure);
    }
    Ok(out)
}
