// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ensembles: neuron populations representing a vector

use ndarray::Array2;
use nef_neural::{Neurons, UniformRange, DEFAULT_REGULARIZATION};

use crate::error::{GraphError, GraphResult};

/// Default range of firing rates at the preferred direction (Hz)
pub const DEFAULT_MAX_RATES: UniformRange = UniformRange::new(200.0, 400.0);

/// Default range of normalised intercepts
pub const DEFAULT_INTERCEPTS: UniformRange = UniformRange::new(-1.0, 1.0);

/// Recognised ensemble configuration, forwarded field by field by
/// composite networks
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOptions {
    pub max_rates: UniformRange,
    pub intercepts: UniformRange,
    /// `n_neurons x dimensions`; random unit vectors when `None`
    pub encoders: Option<Array2<f64>>,
    pub radius: f64,
    /// Falls back to a seed derived from the network seed
    pub seed: Option<u64>,
    /// Falls back to [`nef_neural::default_n_eval_points`]
    pub n_eval_points: Option<usize>,
    /// Decoder regularisation relative to peak activity
    pub regularization: f64,
}

impl Default for EnsembleOptions {
    fn default() -> Self {
        Self {
            max_rates: DEFAULT_MAX_RATES,
            intercepts: DEFAULT_INTERCEPTS,
            encoders: None,
            radius: 1.0,
            seed: None,
            n_eval_points: None,
            regularization: DEFAULT_REGULARIZATION,
        }
    }
}

impl EnsembleOptions {
    pub fn with_max_rates(mut self, low: f64, high: f64) -> Self {
        self.max_rates = UniformRange::new(low, high);
        self
    }

    pub fn with_intercepts(mut self, low: f64, high: f64) -> Self {
        self.intercepts = UniformRange::new(low, high);
        self
    }

    pub fn with_encoders(mut self, encoders: Array2<f64>) -> Self {
        self.encoders = Some(encoders);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_n_eval_points(mut self, n_eval_points: usize) -> Self {
        self.n_eval_points = Some(n_eval_points);
        self
    }

    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Ensemble {
    pub label: String,
    pub neurons: Neurons,
    pub dimensions: usize,
    pub options: EnsembleOptions,
}

impl Ensemble {
    /// # Errors
    /// `InvalidShape` for zero neurons, zero dimensions, a non-positive
    /// radius or encoders not shaped `n_neurons x dimensions`
    pub fn new(
        label: impl Into<String>,
        neurons: Neurons,
        dimensions: usize,
        options: EnsembleOptions,
    ) -> GraphResult<Self> {
        let label = label.into();
        if neurons.n_neurons == 0 {
            return Err(GraphError::InvalidShape(format!(
                "ensemble '{}' needs at least one neuron",
                label
            )));
        }
        if dimensions == 0 {
            return Err(GraphError::InvalidShape(format!(
                "ensemble '{}' needs at least one dimension",
                label
            )));
        }
        if !(options.radius > 0.0) {
            return Err(GraphError::InvalidShape(format!(
                "ensemble '{}' radius {} must be positive",
                label, options.radius
            )));
        }
        if let Some(encoders) = &options.encoders {
            if encoders.dim() != (neurons.n_neurons, dimensions) {
                return Err(GraphError::InvalidShape(format!(
                    "ensemble '{}' encoders are {:?}, expected {:?}",
                    label,
                    encoders.dim(),
                    (neurons.n_neurons, dimensions)
                )));
            }
        }

        Ok(Self {
            label,
            neurons,
            dimensions,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_population() {
        assert!(Ensemble::new("e", Neurons::lif(0), 1, EnsembleOptions::default()).is_err());
        assert!(Ensemble::new("e", Neurons::lif(10), 0, EnsembleOptions::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_encoders_and_radius() {
        let options = EnsembleOptions::default().with_encoders(Array2::ones((3, 2)));
        assert!(Ensemble::new("e", Neurons::lif(4), 2, options).is_err());

        let options = EnsembleOptions::default().with_radius(0.0);
        assert!(Ensemble::new("e", Neurons::lif(4), 2, options).is_err());
    }

    #[test]
    fn test_options_builder() {
        let options = EnsembleOptions::default()
            .with_seed(3)
            .with_max_rates(100.0, 150.0)
            .with_n_eval_points(50);
        assert_eq!(options.seed, Some(3));
        assert_eq!(options.max_rates, UniformRange::new(100.0, 150.0));
        assert_eq!(options.n_eval_points, Some(50));
        assert_eq!(options.intercepts, DEFAULT_INTERCEPTS);
    }
}
