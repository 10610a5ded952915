// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Seeded random number generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic generator for a given seed
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Mix a parent seed with an object index (splitmix64 finaliser) so
/// sibling objects get decorrelated streams
pub fn derive_seed(parent: u64, index: u64) -> u64 {
    let mut z = parent ^ index.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform draw from `[low, high)`, degenerate ranges return `low`
pub(crate) fn uniform<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Standard normal draw (Box-Muller)
pub(crate) fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_seed_decorrelates_siblings() {
        assert_ne!(derive_seed(7, 0), derive_seed(7, 1));
        assert_eq!(derive_seed(7, 3), derive_seed(7, 3));
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let mut rng = seeded_rng(1);
        assert_eq!(uniform(&mut rng, 0.5, 0.5), 0.5);
        let x = uniform(&mut rng, -1.0, 1.0);
        assert!((-1.0..1.0).contains(&x));
    }
}
