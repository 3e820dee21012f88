use asset_bundle::{decode, encode, Bundle, BundleKind};
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_readers_share_decoded_bundle() {
    let mut bundle = Bundle::new(BundleKind::None);
    for i in 0..64u8 {
        bundle.add_asset(format!("asset-{i}"), vec![i; i as usize + 1]);
    }
    let raw = encode(&bundle, BundleKind::Encrypted, b"shared").unwrap();
    let decoded = Arc::new(decode(&raw, b"shared").unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let decoded = Arc::clone(&decoded);
            thread::spawn(move || {
                for round in 0..1000usize {
                    let i = ((round + t) % 64) as u8;
                    let data = decoded.asset(&format!("asset-{i}")).unwrap();
                    assert_eq!(data.len(), i as usize + 1);
                    assert!(data.iter().all(|&b| b == i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn concurrent_encode_decode_heavy() {
    let payload_sizes = [0usize, 64, 512, 4096, 65536];

    thread::scope(|scope| {
        for &size in &payload_sizes {
            scope.spawn(move || {
                for i in 0..50usize {
                    let mut bundle = Bundle::new(BundleKind::None);
                    bundle.add_asset("payload", vec![((i + size) & 0xFF) as u8; size]);
                    let mode = [
                        BundleKind::None,
                        BundleKind::Compressed,
                        BundleKind::Encrypted,
                    ][i % 3];
                    let raw = encode(&bundle, mode, b"key").unwrap();
                    let decoded = decode(&raw, b"key").unwrap();
                    assert_eq!(decoded.asset("payload").unwrap().len(), size);
                }
            });
        }
    });
}
