// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ensemble defaults from `nef-config`

use nef_config::EnsembleConfig;
use nef_neural::{LIFParameters, NeuronType, Neurons, UniformRange};

use crate::ensemble::EnsembleOptions;
use crate::error::{GraphError, GraphResult};

/// Neuron population described by the `[ensemble]` section
///
/// # Errors
/// `InvalidShape` for an unknown `neuron_type`
pub fn neurons_from_config(config: &EnsembleConfig) -> GraphResult<Neurons> {
    let neuron_type = match config.neuron_type.as_str() {
        "lif" => NeuronType::Lif(LIFParameters {
            tau_rc: config.tau_rc,
            tau_ref: config.tau_ref,
        }),
        "rectified_linear" => NeuronType::RectifiedLinear,
        "direct" => NeuronType::Direct,
        other => {
            return Err(GraphError::InvalidShape(format!(
                "unknown neuron type '{}'",
                other
            )))
        }
    };
    Ok(Neurons::new(neuron_type, config.n_neurons))
}

impl From<&EnsembleConfig> for EnsembleOptions {
    fn from(config: &EnsembleConfig) -> Self {
        Self {
            max_rates: UniformRange::new(config.max_rate_low, config.max_rate_high),
            intercepts: UniformRange::new(config.intercept_low, config.intercept_high),
            n_eval_points: (config.n_eval_points > 0).then_some(config.n_eval_points),
            regularization: config.regularization,
            ..Self::default()
        }
    }
}
