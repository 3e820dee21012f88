//! The bundle encode/decode pipelines.
//!
//! Decode runs: header gatekeeps (magic, version, flag) → size ceiling →
//! length and CRC-32 over the wire payload → decrypt (encrypted only) →
//! gunzip (compressed or encrypted) → unflatten. Encode mirrors it.
//!
//! | Flag          | Wire payload                               |
//! |---------------|--------------------------------------------|
//! | `None`        | `flatten(bundle)`                          |
//! | `Compressed`  | `gzip(flatten(bundle))`                    |
//! | `Encrypted`   | `nonce(12) ‖ aes_gcm(gzip(flatten(bundle)))` |
//! | `Development` | `flatten(bundle)`, asset data are paths    |
//!
//! Decode is all-or-nothing: any failure returns an error and no bundle.

use crate::config::{CodecConfig, HEADER_SIZE};
use crate::core::bundle::Bundle;
use crate::core::header::{self, BundleKind, Header};
use crate::core::serialization::{flatten, unflatten};
use crate::error::{BundleError, Result};
use crate::utils::compression::{compress_with_level, decompress_with_limit};
use crate::utils::crypto::{pad_key, Crypto};
use crate::utils::fs;
use crate::utils::metrics::{global_metrics, Timer};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

/// Encoder/decoder bound to one [`CodecConfig`]
#[derive(Debug, Clone, Default)]
pub struct BundleCodec {
    config: CodecConfig,
}

impl BundleCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a bundle through the pipeline selected by `mode`.
    ///
    /// `key` is only used for [`BundleKind::Encrypted`]; it is padded with
    /// [`pad_key`] before use.
    ///
    /// # Errors
    /// - `BundleError::SerializeError` if the asset map cannot be flattened
    /// - `BundleError::InvalidKeyLength` if the padded key is not an AES key size
    /// - `BundleError::CompressionFailure` / `EncryptionFailure` from the transforms
    #[instrument(skip_all, fields(mode = %mode, assets = bundle.len()))]
    pub fn encode(&self, bundle: &Bundle, mode: BundleKind, key: &[u8]) -> Result<Vec<u8>> {
        let _timer = Timer::start("bundle_encode");
        let flat = flatten(bundle, self.config.serialization)?;

        let payload = match mode {
            BundleKind::None | BundleKind::Development => flat,
            BundleKind::Compressed => compress_with_level(&flat, self.config.compression_level)?,
            BundleKind::Encrypted => {
                let compressed = compress_with_level(&flat, self.config.compression_level)?;
                let padded = Zeroizing::new(pad_key(key));
                Crypto::new(&padded)?.seal(&compressed)?
            }
        };

        let framed = header::frame(mode, &payload);
        debug!(payload_bytes = payload.len(), "Bundle encoded");
        global_metrics().bundle_encoded(framed.len() as u64);
        Ok(framed)
    }

    /// Decode raw bundle bytes.
    ///
    /// `key` is only used when the header flag says the payload is encrypted.
    /// The returned bundle's `version` and `info` come from the header.
    #[instrument(skip(self, raw, key), fields(bytes = raw.len()))]
    pub fn decode(&self, raw: &[u8], key: &[u8]) -> Result<Bundle> {
        let _timer = Timer::start("bundle_decode");
        match self.decode_inner(raw, key) {
            Ok(bundle) => {
                global_metrics().bundle_decoded(raw.len() as u64);
                Ok(bundle)
            }
            Err(e) => {
                warn!(error = %e, "Bundle decode failed");
                global_metrics().decode_failed(&e);
                Err(e)
            }
        }
    }

    fn decode_inner(&self, raw: &[u8], key: &[u8]) -> Result<Bundle> {
        let head = Header::parse(raw)?;
        if head.length > self.config.max_payload_size {
            return Err(BundleError::OversizedPayload(head.length));
        }

        let payload = &raw[HEADER_SIZE..];
        head.verify(payload)?;

        let flat: Cow<'_, [u8]> = match head.kind {
            BundleKind::None | BundleKind::Development => Cow::Borrowed(payload),
            BundleKind::Compressed => {
                Cow::Owned(decompress_with_limit(payload, self.config.max_payload_size)?)
            }
            BundleKind::Encrypted => Cow::Owned(self.open_encrypted(payload, key)?),
        };

        let mut bundle = if head.kind == BundleKind::Encrypted {
            // A successful AEAD open followed by garbage still means the key is wrong
            unflatten(&flat).map_err(|_| BundleError::AuthenticationFailed)?
        } else {
            unflatten(&flat)?
        };
        bundle.version = head.version;
        bundle.info = head.kind;

        debug!(kind = %head.kind, assets = bundle.len(), "Bundle decoded");
        Ok(bundle)
    }

    fn open_encrypted(&self, payload: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let padded = Zeroizing::new(pad_key(key));
        let crypto = Crypto::new(&padded)?;
        let plaintext = Zeroizing::new(crypto.open(payload)?);
        decompress_with_limit(&plaintext, self.config.max_payload_size)
            .map_err(|_| BundleError::AuthenticationFailed)
    }

    /// Read a bundle file and decode it
    #[instrument(skip(self, key))]
    pub fn load_file(&self, path: &Path, key: &[u8]) -> Result<Bundle> {
        let raw = fs::read_all(path)?;
        self.decode(&raw, key)
    }

    /// Encode a bundle and write it to `path`
    #[instrument(skip_all, fields(path = %path.display(), mode = %mode))]
    pub fn save_file(&self, path: &Path, bundle: &Bundle, mode: BundleKind, key: &[u8]) -> Result<()> {
        let encoded = self.encode(bundle, mode, key)?;
        fs::write_all(path, &encoded)?;
        Ok(())
    }
}

/// Encode with the default codec configuration
pub fn encode(bundle: &Bundle, mode: BundleKind, key: &[u8]) -> Result<Vec<u8>> {
    BundleCodec::default().encode(bundle, mode, key)
}

/// Decode with the default codec configuration
pub fn decode(raw: &[u8], key: &[u8]) -> Result<Bundle> {
    BundleCodec::default().decode(raw, key)
}

/// Read and decode a bundle file with the default codec configuration
pub fn load_bundle(path: &Path, key: &[u8]) -> Result<Bundle> {
    BundleCodec::default().load_file(path, key)
}
