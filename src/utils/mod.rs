//! # Utility Modules
//!
//! Supporting transforms and plumbing used by the codec.
//!
//! ## Components
//! - **Crypto**: key padding and AES-GCM encryption
//! - **Compression**: gzip with an output size ceiling
//! - **Fs**: whole-file read and write helpers
//! - **Logging**: structured logging configuration
//! - **Metrics**: thread-safe codec counters
//!
//! ## Security
//! - Nonces come from the OS entropy source (getrandom)
//! - Decompression bomb protection
//! - Padded keys and decrypted plaintext are zeroed on drop (zeroize crate)

pub mod compression;
pub mod crypto;
pub mod fs;
pub mod logging;
pub mod metrics;
