// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuron models
//!
//! Rate-mode neuron models used to build tuning curves. Each model maps a
//! normalised input current to a firing rate and knows how to derive
//! gain/bias from a desired maximum rate and intercept.
//!
//! ## Adding a New Neuron Model
//!
//! 1. Create `src/models/your_model.rs`
//! 2. Add a variant to [`NeuronType`] and dispatch `rate`/`gain_bias`
//! 3. Add tests

pub mod lif;

pub use lif::{LIFParameters, DEFAULT_TAU_RC, DEFAULT_TAU_REF};

use crate::types::{NeuralError, NeuralResult};

/// Neuron model of an ensemble
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeuronType {
    /// Leaky integrate-and-fire, rate approximation
    Lif(LIFParameters),

    /// `rate = max(J, 0)`
    RectifiedLinear,

    /// No neurons: decoded functions are evaluated exactly on the
    /// represented value
    Direct,
}

impl Default for NeuronType {
    fn default() -> Self {
        NeuronType::Lif(LIFParameters::default())
    }
}

impl NeuronType {
    pub fn model_name(&self) -> &'static str {
        match self {
            NeuronType::Lif(_) => "Leaky Integrate-and-Fire (LIF)",
            NeuronType::RectifiedLinear => "Rectified Linear",
            NeuronType::Direct => "Direct",
        }
    }

    /// Whether this model is realised by neurons at all
    pub fn is_direct(&self) -> bool {
        matches!(self, NeuronType::Direct)
    }

    pub fn validate(&self) -> NeuralResult<()> {
        match self {
            NeuronType::Lif(params) => params.validate(),
            NeuronType::RectifiedLinear | NeuronType::Direct => Ok(()),
        }
    }

    /// Firing rate for a normalised input current
    #[inline]
    pub fn rate(&self, current: f64) -> f64 {
        match self {
            NeuronType::Lif(params) => params.rate(current),
            NeuronType::RectifiedLinear => current.max(0.0),
            NeuronType::Direct => current,
        }
    }

    /// Gain and bias for one neuron
    pub fn gain_bias(&self, max_rate: f64, intercept: f64) -> NeuralResult<(f64, f64)> {
        match self {
            NeuronType::Lif(params) => params.gain_bias(max_rate, intercept),
            NeuronType::RectifiedLinear => {
                if intercept >= 1.0 {
                    return Err(NeuralError::invalid(
                        "intercepts",
                        format!("intercept {} must be below 1", intercept),
                    ));
                }
                let gain = max_rate / (1.0 - intercept);
                Ok((gain, -gain * intercept))
            }
            NeuronType::Direct => Ok((1.0, 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectified_linear_gain_bias() {
        let model = NeuronType::RectifiedLinear;
        let (gain, bias) = model.gain_bias(100.0, 0.5).unwrap();
        assert!((model.rate(gain + bias) - 100.0).abs() < 1e-9);
        assert_eq!(model.rate(gain * 0.25 + bias), 0.0);
    }

    #[test]
    fn test_default_is_lif() {
        assert_eq!(
            NeuronType::default().model_name(),
            "Leaky Integrate-and-Fire (LIF)"
        );
        assert!(!NeuronType::default().is_direct());
        assert!(NeuronType::Direct.is_direct());
    }
}
