// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for graph construction and evaluation

use nef_neural::NeuralError;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or evaluating a network
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Slice {slice} out of range for {object} (size {size})")]
    SliceOutOfRange {
        object: String,
        slice: String,
        size: usize,
    },

    #[error("Unknown object: {0}")]
    UnknownObject(String),

    #[error("Output '{0}' is already registered")]
    DuplicateOutput(String),

    #[error("No output named '{0}'")]
    UnknownOutput(String),

    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    #[error("Network contains a cycle through: {0}")]
    Cycle(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Neural(#[from] NeuralError),
}
