use rand::Rng;

/// Runs one Bernoulli trial per bit of `bytes` and flips the bits that hit.
///
/// Bit `j` of byte `i` (bit 0 being the least significant) has global index
/// `i * 8 + j`; the returned indices are in ascending order. `rate` must lie
/// in `[0, 1]`.
pub fn flip_bits<R: Rng>(bytes: &mut [u8], rate: f64, rng: &mut R) -> Vec<usize> {
    let mut flipped = Vec::new();
    for (i, byte) in bytes.iter_mut().enumerate() {
        for j in 0..8 {
            if rng.random_bool(rate) {
                *byte ^= 1 << j;
                flipped.push(i * 8 + j);
            }
        }
    }
    flipped
}

/// XORs the single-bit mask for each global index into `bytes`.
///
/// Indices past the end of the buffer are ignored.
pub fn apply_flips(bytes: &mut [u8], indices: &[usize]) {
    for &idx in indices {
        if let Some(b) = bytes.get_mut(idx / 8) {
            *b ^= 1 << (idx % 8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_rate_leaves_bytes_alone() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut b = vec![0x5a, 0xa5, 0x00, 0xff];
        let flipped = flip_bits(&mut b, 0.0, &mut rng);
        assert!(flipped.is_empty());
        assert_eq!(b, vec![0x5a, 0xa5, 0x00, 0xff]);
    }

    #[test]
    fn full_rate_inverts_every_byte() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut b = vec![0x5a, 0x00];
        let flipped = flip_bits(&mut b, 1.0, &mut rng);
        assert_eq!(b, vec![0xa5, 0xff]);
        assert_eq!(flipped, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn apply_flips_matches_kernel() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let orig = vec![0x12, 0x34, 0x56, 0x78, 0x9a];
        let mut mutated = orig.clone();
        let flipped = flip_bits(&mut mutated, 0.3, &mut rng);

        let mut replayed = orig.clone();
        apply_flips(&mut replayed, &flipped);
        assert_eq!(replayed, mutated);
    }

    #[test]
    fn apply_flips_ignores_out_of_range() {
        let mut b = vec![0u8];
        apply_flips(&mut b, &[0, 9, 64]);
        assert_eq!(b, vec![0x01]);
    }
}
