#![no_main]

use asset_bundle::{decode, Header};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header parsing and full decode must reject garbage without panicking
    let _ = Header::parse(data);
    let _ = decode(data, &[]);
    let _ = decode(data, b"12345678901234");
});
