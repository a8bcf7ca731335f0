#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header parsing and 24-bit reads must never panic
    let _ = palbmp::BmpInfo::from_bytes(data);
    let _ = palbmp::decode_rgb24(data, enough::Unstoppable);
});
