// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Evaluation points
//!
//! Samples of the represented space that decoders are optimised over.

use ndarray::Array2;
use rand::Rng;

use crate::rng::standard_normal;

/// Default number of evaluation points for an ensemble
///
/// `max(clamp(500 * dimensions, 750, 2500), 2 * n_neurons)`
pub fn default_n_eval_points(n_neurons: usize, dimensions: usize) -> usize {
    (500 * dimensions).clamp(750, 2500).max(2 * n_neurons)
}

/// Draw `n` points uniformly from the `dimensions`-ball of `radius`
///
/// Directions come from normalised Gaussian samples; the radial
/// coordinate is `radius * u^(1/d)` so density is uniform in volume.
pub fn sample_ball<R: Rng>(rng: &mut R, n: usize, dimensions: usize, radius: f64) -> Array2<f64> {
    let mut points = Array2::zeros((n, dimensions));
    if dimensions == 0 {
        return points;
    }

    for mut row in points.rows_mut() {
        let mut norm_sq = 0.0;
        while norm_sq == 0.0 {
            for value in row.iter_mut() {
                *value = standard_normal(rng);
            }
            norm_sq = row.iter().map(|v| v * v).sum::<f64>();
        }
        let u: f64 = rng.gen::<f64>();
        let scale = radius * u.powf(1.0 / dimensions as f64) / norm_sq.sqrt();
        row.mapv_inplace(|v| v * scale);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;

    #[test]
    fn test_default_count() {
        assert_eq!(default_n_eval_points(50, 1), 750);
        assert_eq!(default_n_eval_points(50, 2), 1000);
        assert_eq!(default_n_eval_points(50, 10), 2500);
        assert_eq!(default_n_eval_points(2000, 2), 4000);
    }

    #[test]
    fn test_points_stay_inside_ball() {
        let mut rng = seeded_rng(3);
        let radius = std::f64::consts::SQRT_2;
        let points = sample_ball(&mut rng, 500, 2, radius);
        assert_eq!(points.dim(), (500, 2));
        for row in points.rows() {
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!(norm <= radius + 1e-12);
        }
    }

    #[test]
    fn test_points_cover_all_quadrants() {
        let mut rng = seeded_rng(11);
        let points = sample_ball(&mut rng, 400, 2, 1.0);
        let mut quadrants = [0usize; 4];
        for row in points.rows() {
            let idx = usize::from(row[0] < 0.0) * 2 + usize::from(row[1] < 0.0);
            quadrants[idx] += 1;
        }
        assert!(quadrants.iter().all(|&count| count > 50));
    }
}
