//! Reversible scrambling of mine bitmaps.
//!
//! Descriptors carry the mine layout as a hex bitmap. Masking it keeps the
//! layout from being read off a shared game ID at a glance. There is no key, so
//! this hides nothing from anyone who wants to decode it.
//!
//! The bitmap is split at its middle byte (rounding down). The first half is
//! XORed with a mask derived from the second half, then the second half with a
//! mask derived from the new first half. [`deobfuscate`] performs the same two
//! steps in the opposite order. A mask is the concatenation of
//! `SHA-256(seed ‖ "0")`, `SHA-256(seed ‖ "1")` and so on, where the counter is
//! written in decimal. Pad bits past the end of the bitmap are cleared after
//! each step, so the output is always a valid bitmap of the same length.
//!
//! # Examples
//!
//! ```
//! use mines_generator::obfuscate::{deobfuscate, obfuscate};
//!
//! let original = vec![0b1000_0001, 0b0100_0000, 0b1110_0000];
//! let mut bitmap = original.clone();
//! obfuscate(&mut bitmap, 19);
//! assert_ne!(bitmap, original);
//! deobfuscate(&mut bitmap, 19);
//! assert_eq!(bitmap, original);
//! ```

use sha2::{Digest as _, Sha256};

/// Masks the first `bits` bits of `bitmap` in place.
///
/// Pad bits in the last byte must be zero on input and are zero on output.
///
/// # Panics
///
/// Panics if `bitmap` is shorter than `bits.div_ceil(8)` bytes.
pub fn obfuscate(bitmap: &mut [u8], bits: usize) {
    transform(bitmap, bits, false);
}

/// Reverses [`obfuscate`].
///
/// # Panics
///
/// Panics if `bitmap` is shorter than `bits.div_ceil(8)` bytes.
pub fn deobfuscate(bitmap: &mut [u8], bits: usize) {
    transform(bitmap, bits, true);
}

fn transform(bitmap: &mut [u8], bits: usize, decode: bool) {
    let bytes = bits.div_ceil(8);
    let (first, second) = bitmap[..bytes].split_at_mut(bytes / 2);
    for step in 0..2 {
        if (step == 0) == decode {
            xor_mask(first, second);
        } else {
            xor_mask(second, first);
        }
        clear_padding(second, bits);
    }
}

/// XORs `target` with the mask stream derived from `seed`.
fn xor_mask(seed: &[u8], target: &mut [u8]) {
    let base = Sha256::new_with_prefix(seed);
    for (counter, chunk) in target.chunks_mut(32).enumerate() {
        let digest = base.clone().chain_update(counter.to_string()).finalize();
        for (b, m) in chunk.iter_mut().zip(digest.iter()) {
            *b ^= m;
        }
    }
}

fn clear_padding(tail: &mut [u8], bits: usize) {
    let used = bits % 8;
    if used != 0
        && let Some(last) = tail.last_mut()
    {
        *last &= 0xff << (8 - used);
    }
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};

    use super::*;

    fn with_clear_padding(mut bitmap: Vec<u8>, bits: usize) -> Vec<u8> {
        bitmap.truncate(bits.div_ceil(8));
        clear_padding(&mut bitmap, bits);
        bitmap
    }

    #[test]
    fn test_obfuscation_changes_both_halves() {
        let original = vec![0; 11];
        let mut bitmap = original.clone();
        obfuscate(&mut bitmap, 81);
        assert_ne!(bitmap[..5], original[..5]);
        assert_ne!(bitmap[5..10], original[5..10]);
        assert_eq!(bitmap[10] & 0x7f, 0, "pad bits stay clear");
    }

    #[test]
    fn test_directions_differ() {
        let original = vec![0x12, 0x34, 0x56, 0x78];
        let mut encoded = original.clone();
        obfuscate(&mut encoded, 32);
        let mut decoded = original.clone();
        deobfuscate(&mut decoded, 32);
        assert_ne!(encoded, decoded);
    }

    #[test]
    fn test_single_byte_is_masked_by_empty_seed() {
        let mut bitmap = vec![0];
        obfuscate(&mut bitmap, 8);
        let expected = Sha256::new().chain_update("0").finalize()[0];
        assert_eq!(bitmap, vec![expected]);
    }

    #[test]
    fn test_empty_bitmap_is_untouched() {
        let mut bitmap: Vec<u8> = Vec::new();
        obfuscate(&mut bitmap, 0);
        assert!(bitmap.is_empty());
    }

    proptest! {
        #[test]
        fn test_round_trip(bits in 0usize..600, bytes in vec(any::<u8>(), 75)) {
            let original = with_clear_padding(bytes, bits);
            let mut bitmap = original.clone();
            obfuscate(&mut bitmap, bits);
            prop_assert_eq!(with_clear_padding(bitmap.clone(), bits), bitmap.clone());
            deobfuscate(&mut bitmap, bits);
            prop_assert_eq!(bitmap, original);
        }
    }
}
