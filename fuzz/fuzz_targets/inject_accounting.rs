#![no_main]

use bitflip_core::canonical::{from_bytes, minimal_bytes};
use bitflip_core::flip::apply_flips;
use bitflip_core::{FaultInjector, InjectorConfig, Injection, StopPolicy};
use libfuzzer_sys::fuzz_target;
use num_bigint::{BigInt, BigUint};

// data[0] picks the rate, data[1..9] the seed, the rest is the value.
fuzz_target!(|data: &[u8]| {
    if data.len() < 10 || data.len() > 74 {
        return;
    }
    let rate = f64::from(data[0]) / 255.0;
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&data[1..9]);
    let value = BigUint::from_bytes_be(&data[9..]);

    let cfg = InjectorConfig::new(StopPolicy::IterationLimit(u64::MAX), vec![rate])
        .with_seed(u64::from_le_bytes(seed));
    let Ok(mut inj) = FaultInjector::with_config(cfg) else {
        return;
    };

    let mut flips = 0u64;
    let Ok(Injection::Injected { value: after, event }) = inj.inject(&value, &mut flips) else {
        panic!("unlimited run must inject");
    };

    assert_eq!(flips as usize, event.flipped_bits.len());
    let mut replay = minimal_bytes(&value);
    apply_flips(&mut replay, &event.flipped_bits);
    assert_eq!(replay, event.after_bytes, "flip pattern does not replay");
    assert_eq!(from_bytes(&replay), after);
    assert_eq!(event.delta, BigInt::from(after) - BigInt::from(event.before.clone()));
});
