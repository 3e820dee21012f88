//! Example: Packing the same assets with every bundle mode
//!
//! Builds a small bundle, encodes it as plain, compressed and encrypted
//! containers, and shows the header and size of each.
//!
//! Run with: `cargo run --example bundle_modes`

#![allow(clippy::uninlined_format_args)]

use asset_bundle::{decode, encode, Bundle, BundleError, BundleKind, Header};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Bundle Modes Demo ===\n");

    let mut bundle = Bundle::new(BundleKind::None);
    bundle.add_asset("index.html", b"<h1>hello</h1>".repeat(64));
    bundle.add_asset("app.js", b"console.log('hi');".to_vec());
    bundle.add_asset("empty.txt", Vec::new());

    let key = b"12345678901234";

    for mode in [BundleKind::None, BundleKind::Compressed, BundleKind::Encrypted] {
        let raw = encode(&bundle, mode, key)?;
        let header = Header::parse(&raw)?;
        println!("{}", mode.name().to_uppercase());
        println!("   - Container size: {} bytes", raw.len());
        println!("   - Header: {:02X?}", &raw[..16]);
        println!("   - Checksum: {:#010x}, length: {}", header.checksum, header.length);

        let recovered = decode(&raw, key)?;
        println!(
            "   - Roundtrip: {}",
            if recovered.asset("index.html")? == bundle.asset("index.html")? {
                "✓ Success"
            } else {
                "✗ Failed"
            }
        );
        println!();
    }

    let encrypted = encode(&bundle, BundleKind::Encrypted, key)?;
    match decode(&encrypted, b"wrong key") {
        Err(BundleError::AuthenticationFailed) => println!("Wrong key rejected: ✓"),
        other => println!("Unexpected result for wrong key: {:?}", other.map(|b| b.len())),
    }

    Ok(())
}
