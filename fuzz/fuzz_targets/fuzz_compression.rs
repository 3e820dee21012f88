#![no_main]

use asset_bundle::utils::compression::{compress, decompress, decompress_with_limit};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(compressed) = compress(data) {
        let _ = decompress(&compressed);
    }

    // Malformed streams and tight limits
    let _ = decompress(data);
    let _ = decompress_with_limit(data, 1024);
});
