//! # Asset Bundle
//!
//! A versioned binary container that packs named byte payloads ("assets") into
//! a single file, with optional gzip compression, optional AES-GCM encryption
//! and CRC-32 integrity checking.
//!
//! ## Layout
//! ```text
//! offset  size  field
//! 0       2     magic     0x03 0x0E
//! 2       1     version   1
//! 3       1     flag      0=none 1=compressed 2=encrypted 3=development
//! 4       4     checksum  CRC-32/IEEE of payload, big-endian
//! 8       8     length    payload length, big-endian
//! 16      N     payload
//! ```
//!
//! ## Example
//! ```rust
//! use asset_bundle::{decode, encode, Bundle, BundleError, BundleKind};
//!
//! let mut bundle = Bundle::new(BundleKind::None);
//! bundle.add_asset("example", vec![3, 14, 15, 92, 65]);
//!
//! let raw = encode(&bundle, BundleKind::Encrypted, b"12345678901234").unwrap();
//! let decoded = decode(&raw, b"12345678901234").unwrap();
//!
//! assert_eq!(&*decoded.asset("example").unwrap(), &[3, 14, 15, 92, 65]);
//! assert!(matches!(decoded.asset("missing"), Err(BundleError::AssetNotFound(_))));
//! ```
//!
//! ## Security
//! - Key padding repeats the key; it is not a key derivation function
//! - Authentication failures are reported as one opaque error
//! - Integrity is checked over the wire bytes before any transform runs

#![deny(unsafe_code)]

pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

pub use crate::core::bundle::{Asset, Bundle};
pub use crate::core::codec::{decode, encode, load_bundle, BundleCodec};
pub use crate::core::header::{BundleKind, Header};
pub use crate::core::serialization::SerializationFormat;
pub use builder::BundleBuilder;
pub use config::BundleConfig;
pub use error::{BundleError, ErrorCategory, Result};
