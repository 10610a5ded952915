// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # LIF (Leaky Integrate-and-Fire) rate model
//!
//! Steady-state firing rate of a LIF neuron driven by a constant
//! normalised current `J` (threshold at `J = 1`):
//!
//! ```text
//! rate(J) = 1 / (tau_ref + tau_rc * ln(1 + 1 / (J - 1)))   for J > 1
//!         = 0                                               otherwise
//! ```
//!
//! Gain and bias are chosen so a neuron fires at `max_rate` when the
//! projected input is 1 and starts firing at `intercept`:
//!
//! ```text
//! x    = 1 / (1 - exp((tau_ref - 1 / max_rate) / tau_rc))
//! gain = (1 - x) / (intercept - 1)
//! bias = 1 - gain * intercept
//! ```

use crate::types::{NeuralError, NeuralResult};

/// Default membrane time constant (seconds)
pub const DEFAULT_TAU_RC: f64 = 0.02;

/// Default absolute refractory period (seconds)
pub const DEFAULT_TAU_REF: f64 = 0.002;

/// LIF model parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LIFParameters {
    /// Membrane RC time constant (seconds)
    pub tau_rc: f64,

    /// Refractory period (seconds)
    pub tau_ref: f64,
}

impl Default for LIFParameters {
    fn default() -> Self {
        Self {
            tau_rc: DEFAULT_TAU_RC,
            tau_ref: DEFAULT_TAU_REF,
        }
    }
}

impl LIFParameters {
    pub fn validate(&self) -> NeuralResult<()> {
        if !(self.tau_rc > 0.0) {
            return Err(NeuralError::invalid("tau_rc", "must be positive"));
        }
        if self.tau_ref < 0.0 {
            return Err(NeuralError::invalid("tau_ref", "must be non-negative"));
        }
        Ok(())
    }

    /// Firing rate for a normalised input current
    #[inline]
    pub fn rate(&self, current: f64) -> f64 {
        if current > 1.0 {
            1.0 / (self.tau_ref + self.tau_rc * (1.0 / (current - 1.0)).ln_1p())
        } else {
            0.0
        }
    }

    /// Gain and bias that place the threshold at `intercept` and reach
    /// `max_rate` at an input of 1
    pub fn gain_bias(&self, max_rate: f64, intercept: f64) -> NeuralResult<(f64, f64)> {
        if intercept >= 1.0 {
            return Err(NeuralError::invalid(
                "intercepts",
                format!("intercept {} must be below 1", intercept),
            ));
        }
        if !(max_rate > 0.0) {
            return Err(NeuralError::invalid(
                "max_rates",
                format!("max rate {} must be positive", max_rate),
            ));
        }
        if self.tau_ref > 0.0 && max_rate >= 1.0 / self.tau_ref {
            return Err(NeuralError::invalid(
                "max_rates",
                format!(
                    "max rate {} is not reachable with tau_ref {} (limit {})",
                    max_rate,
                    self.tau_ref,
                    1.0 / self.tau_ref
                ),
            ));
        }

        let x = 1.0 / (1.0 - ((self.tau_ref - 1.0 / max_rate) / self.tau_rc).exp());
        let gain = (1.0 - x) / (intercept - 1.0);
        let bias = 1.0 - gain * intercept;
        Ok((gain, bias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_is_zero_below_threshold() {
        let params = LIFParameters::default();
        assert_eq!(params.rate(0.5), 0.0);
        assert_eq!(params.rate(1.0), 0.0);
        assert!(params.rate(1.5) > 0.0);
    }

    #[test]
    fn test_gain_bias_hits_max_rate_and_intercept() {
        let params = LIFParameters::default();
        let (gain, bias) = params.gain_bias(200.0, -0.3).unwrap();

        // Input 1 -> max rate
        assert!((params.rate(gain + bias) - 200.0).abs() < 1e-6);

        // Intercept sits exactly on threshold
        assert!((gain * -0.3 + bias - 1.0).abs() < 1e-12);
        assert_eq!(params.rate(gain * -0.31 + bias), 0.0);
    }

    #[test]
    fn test_unreachable_max_rate_rejected() {
        let params = LIFParameters::default();
        assert!(params.gain_bias(600.0, 0.0).is_err());
        assert!(params.gain_bias(100.0, 1.0).is_err());
    }
}
