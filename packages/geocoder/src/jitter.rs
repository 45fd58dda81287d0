//! Deterministic pseudo-random offsets.
//!
//! Hashes a seed string with a 32-bit FNV-1a mix so the same record always
//! lands on the same point across runs and platforms. Strings are hashed
//! per UTF-16 code unit.

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// 2^32, used to map a hash onto `[0, 1)`.
const HASH_SPACE: f64 = 4_294_967_296.0;

/// Hashes `input` with the 32-bit FNV-1a mix.
///
/// The multiply by the FNV prime (`16777619`) is spelled out as
/// shift-and-add with wrapping arithmetic.
#[must_use]
pub fn fnv1a32(input: &str) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for unit in input.encode_utf16() {
        h ^= u32::from(unit);
        h = h
            .wrapping_add(h << 1)
            .wrapping_add(h << 4)
            .wrapping_add(h << 7)
            .wrapping_add(h << 8)
            .wrapping_add(h << 24);
    }
    h
}

/// Maps a hash onto `[0, 1)`.
#[must_use]
pub fn unit_interval(hash: u32) -> f64 {
    f64::from(hash) / HASH_SPACE
}

/// Returns `(dlat, dlng)`, each in `[-scale/2, +scale/2)`.
///
/// The two axes are hashed independently from `"<seed>:lat"` and
/// `"<seed>:lng"`.
#[must_use]
pub fn jitter(seed: &str, scale: f64) -> (f64, f64) {
    let dlat = (unit_interval(fnv1a32(&format!("{seed}:lat"))) - 0.5) * scale;
    let dlng = (unit_interval(fnv1a32(&format!("{seed}:lng"))) - 0.5) * scale;
    (dlat, dlng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(fnv1a32(""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn shift_and_add_matches_fnv_prime() {
        let mut h = FNV_OFFSET_BASIS;
        for b in "abc".bytes() {
            h ^= u32::from(b);
            h = h.wrapping_mul(16_777_619);
        }
        assert_eq!(fnv1a32("abc"), h);
    }

    #[test]
    fn known_vector() {
        // Standard FNV-1a 32-bit test vector for "a".
        assert_eq!(fnv1a32("a"), 0xe40c_292c);
    }

    #[test]
    fn jitter_is_deterministic() {
        let a = jitter("123 Main St|GREEN LEAF", 0.004);
        let b = jitter("123 Main St|GREEN LEAF", 0.004);
        assert_eq!(a.0.to_bits(), b.0.to_bits());
        assert_eq!(a.1.to_bits(), b.1.to_bits());
    }

    #[test]
    fn different_seeds_differ() {
        let a = jitter("123 Main St|GREEN LEAF", 0.004);
        let b = jitter("125 Main St|GREEN LEAF", 0.004);
        assert_ne!(a, b);
    }

    #[test]
    fn jitter_stays_within_half_scale() {
        let scale = 0.004;
        for i in 0..500 {
            let (dlat, dlng) = jitter(&format!("seed-{i}"), scale);
            assert!((-scale / 2.0..scale / 2.0).contains(&dlat), "dlat {dlat}");
            assert!((-scale / 2.0..scale / 2.0).contains(&dlng), "dlng {dlng}");
        }
    }

    #[test]
    fn zero_scale_is_no_offset() {
        assert_eq!(jitter("anything", 0.0), (0.0, 0.0));
    }
}
