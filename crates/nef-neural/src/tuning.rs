// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Tuning curves
//!
//! Per-neuron encoders, gains and biases of one ensemble, and the rate
//! response of the population to points in the represented space.
//!
//! ```text
//! J_i(x) = gain_i * <e_i, x / radius> + bias_i
//! a_i(x) = rate(J_i(x))
//! ```
//!
//! Encoder rows are preferred directions; their magnitude is discarded.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;

use crate::models::NeuronType;
use crate::rng::{standard_normal, uniform};
use crate::types::{NeuralError, NeuralResult, UniformRange};

/// Tuning parameters of a neuron population
#[derive(Debug, Clone)]
pub struct TuningCurves {
    pub neuron_type: NeuronType,
    /// Unit-length preferred directions, `n_neurons x dimensions`
    pub encoders: Array2<f64>,
    pub gains: Array1<f64>,
    pub biases: Array1<f64>,
    pub radius: f64,
}

impl TuningCurves {
    /// Derive tuning curves for `n_neurons` neurons in `dimensions`-space
    ///
    /// # Arguments
    /// * `encoders` - Explicit preferred directions; drawn uniformly from the
    ///   unit sphere when `None`
    /// * `max_rates` - Range of firing rates at the preferred direction
    /// * `intercepts` - Range of normalised thresholds along the encoder
    ///
    /// # Errors
    /// Invalid ranges, a non-positive radius, encoder shape mismatches and
    /// zero-length encoder rows
    #[allow(clippy::too_many_arguments)]
    pub fn generate<R: Rng>(
        rng: &mut R,
        neuron_type: NeuronType,
        n_neurons: usize,
        dimensions: usize,
        encoders: Option<ArrayView2<'_, f64>>,
        max_rates: UniformRange,
        intercepts: UniformRange,
        radius: f64,
    ) -> NeuralResult<Self> {
        neuron_type.validate()?;
        max_rates.validate("max_rates")?;
        intercepts.validate("intercepts")?;
        if !(radius > 0.0) {
            return Err(NeuralError::invalid("radius", format!("{} must be positive", radius)));
        }

        let encoders = match encoders {
            Some(given) => normalize_rows(given, n_neurons, dimensions)?,
            None => sample_unit_sphere(rng, n_neurons, dimensions),
        };

        let mut gains = Array1::zeros(n_neurons);
        let mut biases = Array1::zeros(n_neurons);
        for i in 0..n_neurons {
            let max_rate = uniform(rng, max_rates.low, max_rates.high);
            let intercept = uniform(rng, intercepts.low, intercepts.high);
            let (gain, bias) = neuron_type.gain_bias(max_rate, intercept)?;
            gains[i] = gain;
            biases[i] = bias;
        }

        Ok(Self {
            neuron_type,
            encoders,
            gains,
            biases,
            radius,
        })
    }

    pub fn n_neurons(&self) -> usize {
        self.encoders.nrows()
    }

    pub fn dimensions(&self) -> usize {
        self.encoders.ncols()
    }

    /// Input currents for each point (rows) and neuron (columns)
    pub fn currents(&self, points: ArrayView2<'_, f64>) -> NeuralResult<Array2<f64>> {
        if points.ncols() != self.dimensions() {
            return Err(NeuralError::ShapeMismatch {
                context: "tuning curve input",
                expected: (points.nrows(), self.dimensions()),
                actual: points.dim(),
            });
        }
        let projected = points.dot(&self.encoders.t()) / self.radius;
        Ok(projected * &self.gains.view().insert_axis(Axis(0))
            + &self.biases.view().insert_axis(Axis(0)))
    }

    /// Firing rates for each point (rows) and neuron (columns)
    pub fn activities(&self, points: ArrayView2<'_, f64>) -> NeuralResult<Array2<f64>> {
        let neuron_type = self.neuron_type;
        Ok(self.currents(points)?.mapv(|j| neuron_type.rate(j)))
    }
}

fn normalize_rows(
    given: ArrayView2<'_, f64>,
    n_neurons: usize,
    dimensions: usize,
) -> NeuralResult<Array2<f64>> {
    if given.dim() != (n_neurons, dimensions) {
        return Err(NeuralError::ShapeMismatch {
            context: "encoders",
            expected: (n_neurons, dimensions),
            actual: given.dim(),
        });
    }
    let mut encoders = given.to_owned();
    for (i, mut row) in encoders.rows_mut().into_iter().enumerate() {
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if !(norm > 0.0) || !norm.is_finite() {
            return Err(NeuralError::invalid(
                "encoders",
                format!("row {} has no usable direction", i),
            ));
        }
        row.mapv_inplace(|v| v / norm);
    }
    Ok(encoders)
}

fn sample_unit_sphere<R: Rng>(rng: &mut R, n: usize, dimensions: usize) -> Array2<f64> {
    let mut encoders = Array2::zeros((n, dimensions));
    for mut row in encoders.rows_mut() {
        let mut norm_sq = 0.0;
        while norm_sq == 0.0 {
            for value in row.iter_mut() {
                *value = standard_normal(rng);
            }
            norm_sq = row.iter().map(|v| v * v).sum::<f64>();
        }
        let norm = norm_sq.sqrt();
        row.mapv_inplace(|v| v / norm);
    }
    encoders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use ndarray::array;

    #[test]
    fn test_given_encoders_are_normalized() {
        let mut rng = seeded_rng(0);
        let given = array![[3.0, 4.0], [0.0, -2.0]];
        let curves = TuningCurves::generate(
            &mut rng,
            NeuronType::default(),
            2,
            2,
            Some(given.view()),
            UniformRange::new(200.0, 400.0),
            UniformRange::new(-1.0, 1.0),
            1.0,
        )
        .unwrap();
        assert!((curves.encoders[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((curves.encoders[[0, 1]] - 0.8).abs() < 1e-12);
        assert!((curves.encoders[[1, 1]] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_encoder_shape_mismatch() {
        let mut rng = seeded_rng(0);
        let given = array![[1.0, 0.0]];
        let err = TuningCurves::generate(
            &mut rng,
            NeuronType::default(),
            3,
            2,
            Some(given.view()),
            UniformRange::new(200.0, 400.0),
            UniformRange::new(-1.0, 1.0),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, NeuralError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_zero_encoder_row_rejected() {
        let mut rng = seeded_rng(0);
        let given = array![[0.0, 0.0]];
        let result = TuningCurves::generate(
            &mut rng,
            NeuronType::default(),
            1,
            2,
            Some(given.view()),
            UniformRange::new(200.0, 400.0),
            UniformRange::new(-1.0, 1.0),
            1.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_neuron_reaches_max_rate_at_radius() {
        let mut rng = seeded_rng(5);
        let given = array![[1.0]];
        let curves = TuningCurves::generate(
            &mut rng,
            NeuronType::default(),
            1,
            1,
            Some(given.view()),
            UniformRange::new(300.0, 300.0),
            UniformRange::new(0.0, 0.0),
            2.0,
        )
        .unwrap();
        let rates = curves.activities(array![[2.0], [0.0], [-1.0]].view()).unwrap();
        assert!((rates[[0, 0]] - 300.0).abs() < 1e-6);
        assert_eq!(rates[[1, 0]], 0.0);
        assert_eq!(rates[[2, 0]], 0.0);
    }
}
