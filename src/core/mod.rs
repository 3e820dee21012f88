//! # Core Bundle Components
//!
//! Header framing, the in-memory model, asset-map serialization and the
//! encode/decode pipelines.
//!
//! ## Components
//! - **Header**: magic, version, flag, CRC-32 and length framing
//! - **Bundle**: name → asset map with development-mode indirection
//! - **Serialization**: self-describing flatten/unflatten
//! - **Codec**: composes framing, gzip, AES-GCM and serialization
//!
//! ## Wire Format
//! ```text
//! [Magic(2)] [Version(1)] [Flag(1)] [CRC-32(4)] [Length(8)] [Payload(N)]
//! ```
//!
//! ## Security
//! - Length and checksum are verified before any decryption or decompression
//! - Declared payload length is bounded by the codec's `max_payload_size`
//! - Decompressed output is bounded by the same ceiling

pub mod bundle;
pub mod codec;
pub mod header;
pub mod serialization;
