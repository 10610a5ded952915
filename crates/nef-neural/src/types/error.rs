// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural numerics

/// Result type for neural operations
pub type NeuralResult<T> = Result<T, NeuralError>;

/// Errors raised while deriving tuning curves or solving decoders
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeuralError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Decoder system is singular: {0}")]
    SingularSystem(String),
}

impl NeuralError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        NeuralError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
