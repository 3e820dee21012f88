//! AES-GCM encryption for bundle payloads.
//!
//! Encrypted payloads are laid out as `nonce(12) || ciphertext || tag(16)`.
//! A fresh random nonce is drawn for every call to [`Crypto::encrypt`]; no
//! associated data is authenticated.
//!
//! The cipher variant follows the key length: 16 bytes selects AES-128,
//! 24 bytes AES-192 and 32 bytes AES-256.

use crate::config::NONCE_SIZE;
use crate::error::{constants, BundleError, Result};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use tracing::{debug, error};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Expand a secret into a key whose length is a positive multiple of 16.
///
/// The key is repeated cyclically to fill the output. This is padding, not key
/// derivation: it adds no entropy and gives no protection against weak keys.
///
/// Inputs that are already a multiple of 16 grow by one extra block (16 bytes
/// pad to 32, 32 to 48). Bundles written with format version 1 depend on this.
pub fn pad_key(key: &[u8]) -> Vec<u8> {
    let len = key.len();
    if len == 0 {
        return vec![0u8; 16];
    }

    let remainder = len % 16;
    let blocks = (len + 16 - remainder) / 16;

    key.iter().copied().cycle().take(blocks * 16).collect()
}

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// An AES-GCM cipher bound to one key
pub struct Crypto {
    cipher: Cipher,
}

impl Crypto {
    /// Build a cipher from an already padded key.
    ///
    /// # Errors
    /// Returns `BundleError::InvalidKeyLength` unless the key is 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        let invalid = |_| BundleError::InvalidKeyLength(key.len());
        let cipher = match key.len() {
            16 => Cipher::Aes128(Aes128Gcm::new_from_slice(key).map_err(invalid)?),
            24 => Cipher::Aes192(Aes192Gcm::new_from_slice(key).map_err(invalid)?),
            32 => Cipher::Aes256(Aes256Gcm::new_from_slice(key).map_err(invalid)?),
            other => return Err(BundleError::InvalidKeyLength(other)),
        };
        Ok(Self { cipher })
    }

    /// Generate a random 12-byte nonce from the OS entropy source
    pub fn generate_nonce() -> Result<[u8; NONCE_SIZE]> {
        let mut nonce = [0u8; NONCE_SIZE];
        getrandom::fill(&mut nonce).map_err(|e| {
            error!(error = %e, "{}", constants::ERR_NONCE_GENERATION);
            BundleError::EncryptionFailure
        })?;
        Ok(nonce)
    }

    /// Encrypt under a fresh nonce, returning `(ciphertext_with_tag, nonce)`
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE])> {
        let nonce = Self::generate_nonce()?;
        let ciphertext = self.encrypt_with_nonce(plaintext, &nonce)?;
        Ok((ciphertext, nonce))
    }

    fn encrypt_with_nonce(&self, plaintext: &[u8], nonce: &[u8; NONCE_SIZE]) -> Result<Vec<u8>> {
        let nonce = Nonce::from_slice(nonce);
        let sealed = match &self.cipher {
            Cipher::Aes128(c) => c.encrypt(nonce, plaintext),
            Cipher::Aes192(c) => c.encrypt(nonce, plaintext),
            Cipher::Aes256(c) => c.encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| BundleError::EncryptionFailure)
    }

    /// Decrypt and authenticate.
    ///
    /// # Errors
    /// Returns `BundleError::AuthenticationFailed` for a wrong key, wrong nonce
    /// or tampered ciphertext alike.
    pub fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != NONCE_SIZE {
            return Err(BundleError::AuthenticationFailed);
        }
        let nonce = Nonce::from_slice(nonce);
        let opened = match &self.cipher {
            Cipher::Aes128(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes192(c) => c.decrypt(nonce, ciphertext),
            Cipher::Aes256(c) => c.decrypt(nonce, ciphertext),
        };
        opened.map_err(|_| {
            debug!("{}", constants::ERR_AUTHENTICATION_FAILED);
            BundleError::AuthenticationFailed
        })
    }

    /// Encrypt and prepend the nonce: `nonce || ciphertext`
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let (ciphertext, nonce) = self.encrypt(plaintext)?;
        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend(ciphertext);
        Ok(out)
    }

    /// Split `nonce || ciphertext` and decrypt
    pub fn open(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() < NONCE_SIZE {
            return Err(BundleError::AuthenticationFailed);
        }
        let (nonce, ciphertext) = payload.split_at(NONCE_SIZE);
        self.decrypt(ciphertext, nonce)
    }
}

/// Encrypt `plaintext` with an already padded key, returning `(ciphertext_with_tag, nonce)`
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE])> {
    Crypto::new(key)?.encrypt(plaintext)
}

/// Decrypt `ciphertext` with an already padded key and its nonce
pub fn decrypt(ciphertext: &[u8], key: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    Crypto::new(key)?.decrypt(ciphertext, nonce)
}
