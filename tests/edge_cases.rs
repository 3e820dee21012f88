#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for decode robustness
//! Tests header gatekeeps, integrity failures, tampering and empty inputs

use asset_bundle::config::{HEADER_SIZE, NONCE_SIZE};
use asset_bundle::error::ErrorCategory;
use asset_bundle::utils::crypto::{pad_key, Crypto};
use asset_bundle::{decode, encode, Bundle, BundleError, BundleKind};

fn sample() -> Bundle {
    let mut bundle = Bundle::new(BundleKind::None);
    bundle.add_asset("example", vec![3, 14, 15, 92, 65]);
    bundle.add_asset("index.html", b"<html><body>hi</body></html>".to_vec());
    bundle
}

// ============================================================================
// HEADER GATEKEEPS
// ============================================================================

#[test]
fn test_empty_buffer_is_not_a_bundle() {
    assert!(matches!(decode(&[], &[]), Err(BundleError::NotABundle)));
}

#[test]
fn test_wrong_magic() {
    let mut raw = encode(&sample(), BundleKind::None, &[]).unwrap();
    raw[0] = 0x1f;
    raw[1] = 0x8b;
    let err = decode(&raw, &[]).unwrap_err();
    assert!(matches!(err, BundleError::NotABundle));
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn test_wrong_version() {
    let mut raw = encode(&sample(), BundleKind::None, &[]).unwrap();
    raw[2] = 2;
    assert!(matches!(
        decode(&raw, &[]),
        Err(BundleError::UnsupportedVersion(2))
    ));
}

#[test]
fn test_unknown_flag() {
    let mut raw = encode(&sample(), BundleKind::None, &[]).unwrap();
    raw[3] = 4;
    assert!(matches!(decode(&raw, &[]), Err(BundleError::UnknownFlag(4))));
}

#[test]
fn test_truncated_header() {
    let raw = encode(&sample(), BundleKind::None, &[]).unwrap();
    assert!(matches!(
        decode(&raw[..10], &[]),
        Err(BundleError::TruncatedHeader(10))
    ));
}

#[test]
fn test_magic_checked_before_version() {
    // Both magic and version are wrong: magic wins
    let mut raw = encode(&sample(), BundleKind::None, &[]).unwrap();
    raw[0] = 0;
    raw[2] = 9;
    assert!(matches!(decode(&raw, &[]), Err(BundleError::NotABundle)));
}

// ============================================================================
// INTEGRITY
// ============================================================================

#[test]
fn test_truncated_payload_is_length_mismatch() {
    for mode in [
        BundleKind::None,
        BundleKind::Compressed,
        BundleKind::Encrypted,
    ] {
        let raw = encode(&sample(), mode, b"key").unwrap();
        let truncated = &raw[..raw.len() - 1];
        let err = decode(truncated, b"key").unwrap_err();
        assert!(
            matches!(err, BundleError::LengthMismatch { .. }),
            "{mode}: {err:?}"
        );
        assert_eq!(err.category(), ErrorCategory::Integrity);
    }
}

#[test]
fn test_every_payload_byte_flip_is_checksum_mismatch() {
    let raw = encode(&sample(), BundleKind::Compressed, &[]).unwrap();
    for i in HEADER_SIZE..raw.len() {
        let mut corrupted = raw.clone();
        corrupted[i] ^= 0x5A;
        assert!(
            matches!(
                decode(&corrupted, &[]),
                Err(BundleError::ChecksumMismatch { .. })
            ),
            "byte {i} flip not detected"
        );
    }
}

#[test]
fn test_checksum_protects_encrypted_wire_bytes() {
    let raw = encode(&sample(), BundleKind::Encrypted, b"key").unwrap();
    let mut corrupted = raw.clone();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0x01;
    // Integrity gate fires before decryption is attempted
    assert!(matches!(
        decode(&corrupted, b"key"),
        Err(BundleError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_appended_bytes_are_length_mismatch() {
    let mut raw = encode(&sample(), BundleKind::None, &[]).unwrap();
    raw.push(0);
    assert!(matches!(
        decode(&raw, &[]),
        Err(BundleError::LengthMismatch { .. })
    ));
}

// ============================================================================
// TAMPER DETECTION
// ============================================================================

#[test]
fn test_every_ciphertext_bit_flip_fails_authentication() {
    let crypto = Crypto::new(&pad_key(b"12345678901234")).unwrap();
    let plaintext = b"attack at dawn";
    let (ciphertext, nonce) = crypto.encrypt(plaintext).unwrap();

    for byte in 0..ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = ciphertext.clone();
            tampered[byte] ^= 1 << bit;
            assert!(matches!(
                crypto.decrypt(&tampered, &nonce),
                Err(BundleError::AuthenticationFailed)
            ));
        }
    }
}

#[test]
fn test_reframed_tampered_ciphertext_fails_authentication() {
    // An attacker who also recomputes the CRC gets past the integrity gate
    let raw = encode(&sample(), BundleKind::Encrypted, b"key").unwrap();
    let mut payload = raw[HEADER_SIZE..].to_vec();
    payload[NONCE_SIZE + 1] ^= 0x80;
    let reframed = asset_bundle::core::header::frame(BundleKind::Encrypted, &payload);

    let err = decode(&reframed, b"key").unwrap_err();
    assert!(matches!(err, BundleError::AuthenticationFailed));
    assert_eq!(err.category(), ErrorCategory::Crypto);
}

#[test]
fn test_wrong_key_and_corruption_look_the_same() {
    let raw = encode(&sample(), BundleKind::Encrypted, b"right key").unwrap();
    let wrong_key = decode(&raw, b"wrong key").unwrap_err();

    let mut payload = raw[HEADER_SIZE..].to_vec();
    payload[0] ^= 0x01; // nonce byte
    let reframed = asset_bundle::core::header::frame(BundleKind::Encrypted, &payload);
    let bad_nonce = decode(&reframed, b"right key").unwrap_err();

    assert_eq!(wrong_key.to_string(), bad_nonce.to_string());
}

#[test]
fn test_encrypted_payload_shorter_than_nonce() {
    let reframed = asset_bundle::core::header::frame(BundleKind::Encrypted, &[0u8; 5]);
    assert!(matches!(
        decode(&reframed, b"key"),
        Err(BundleError::AuthenticationFailed)
    ));
}

// ============================================================================
// MALFORMED PAYLOADS
// ============================================================================

#[test]
fn test_compressed_flag_over_plain_payload() {
    let plain = encode(&sample(), BundleKind::None, &[]).unwrap();
    let reframed =
        asset_bundle::core::header::frame(BundleKind::Compressed, &plain[HEADER_SIZE..]);
    assert!(matches!(
        decode(&reframed, &[]),
        Err(BundleError::DecompressionFailure)
    ));
}

#[test]
fn test_garbage_payload_is_deserialize_error() {
    let reframed = asset_bundle::core::header::frame(BundleKind::None, &[0x03, 0xC1, 0xC1]);
    let err = decode(&reframed, &[]).unwrap_err();
    assert!(matches!(err, BundleError::DeserializeError(_)));
    assert_eq!(err.category(), ErrorCategory::Serialize);
}

#[test]
fn test_empty_payload_is_deserialize_error() {
    let reframed = asset_bundle::core::header::frame(BundleKind::None, &[]);
    assert!(matches!(
        decode(&reframed, &[]),
        Err(BundleError::DeserializeError(_))
    ));
}

// ============================================================================
// EMPTY VALUES
// ============================================================================

#[test]
fn test_empty_bundle_every_mode() {
    let empty = Bundle::new(BundleKind::None);
    for mode in [
        BundleKind::None,
        BundleKind::Compressed,
        BundleKind::Encrypted,
        BundleKind::Development,
    ] {
        let raw = encode(&empty, mode, &[]).unwrap();
        let decoded = decode(&raw, &[]).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.info, mode);
    }
}

#[test]
fn test_empty_asset_payload() {
    let mut bundle = Bundle::new(BundleKind::None);
    bundle.add_asset("blank", Vec::new());
    let raw = encode(&bundle, BundleKind::Compressed, &[]).unwrap();
    let decoded = decode(&raw, &[]).unwrap();
    assert!(decoded.asset("blank").unwrap().is_empty());
}

#[test]
fn test_empty_key_encrypts_with_zero_key() {
    let raw = encode(&sample(), BundleKind::Encrypted, &[]).unwrap();
    assert!(decode(&raw, &[]).is_ok());
    // Sixteen zero bytes pad to 32 bytes, a different AES-256 key
    assert!(matches!(
        decode(&raw, &[0u8; 16]),
        Err(BundleError::AuthenticationFailed)
    ));
}
