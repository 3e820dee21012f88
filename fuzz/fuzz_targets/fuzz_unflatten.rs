#![no_main]

use asset_bundle::core::serialization::unflatten;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = unflatten(data);
});
