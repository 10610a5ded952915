// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by the numerics modules

pub mod error;

pub use error::{NeuralError, NeuralResult};

/// Closed interval `[low, high]` that per-neuron parameters are drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformRange {
    pub low: f64,
    pub high: f64,
}

impl UniformRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Check the bounds are finite and ordered
    pub fn validate(&self, name: &'static str) -> NeuralResult<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(NeuralError::invalid(name, "bounds must be finite"));
        }
        if self.low > self.high {
            return Err(NeuralError::invalid(
                name,
                format!("low {} exceeds high {}", self.low, self.high),
            ));
        }
        Ok(())
    }
}

impl From<(f64, f64)> for UniformRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}
