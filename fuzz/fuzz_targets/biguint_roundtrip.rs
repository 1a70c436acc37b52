#![no_main]

use bitflip_core::canonical::{canonicalize, fixed_bytes, from_bytes, minimal_bytes};
use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 64 {
        return;
    }

    let x = BigUint::from_bytes_be(data);

    // Minimal bytes reassemble to the same value.
    assert_eq!(from_bytes(&minimal_bytes(&x)), x, "minimal roundtrip mismatch");

    // Fixed-width bytes reassemble to the canonical value.
    let fixed = fixed_bytes(&x, 256);
    assert_eq!(fixed.len(), 32, "fixed serialization is not 32 bytes");
    assert_eq!(from_bytes(&fixed), canonicalize(&x, 256), "fixed roundtrip mismatch");
});
