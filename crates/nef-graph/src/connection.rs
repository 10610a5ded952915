// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connections: directed, optionally filtered signal links
//!
//! ```text
//! source[slice] --function--> --transform--> --filter--> target[slice]
//! ```
//!
//! `function` is only allowed from ensembles; it is realised by decoders
//! solved over the source's evaluation points.

use core::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2};

use crate::slice::PortRef;

/// Default synaptic time constant (seconds)
pub const DEFAULT_SYNAPSE_TAU: f64 = 0.005;

/// Temporal filter on a connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// First-order lowpass with unit DC gain
    Lowpass { tau: f64 },
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Lowpass {
            tau: DEFAULT_SYNAPSE_TAU,
        }
    }
}

/// Linear map applied after the (optional) function
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Identity,
    Scalar(f64),
    /// `size_out x size_mid`
    Matrix(Array2<f64>),
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Identity
    }
}

impl Transform {
    /// Output width for a `size_mid` input, `None` if the shapes disagree
    pub fn size_out(&self, size_mid: usize) -> Option<usize> {
        match self {
            Transform::Identity | Transform::Scalar(_) => Some(size_mid),
            Transform::Matrix(matrix) => (matrix.ncols() == size_mid).then(|| matrix.nrows()),
        }
    }

    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        match self {
            Transform::Identity => values.to_vec(),
            Transform::Scalar(scale) => values.iter().map(|v| v * scale).collect(),
            Transform::Matrix(matrix) => matrix.dot(&Array1::from(values.to_vec())).to_vec(),
        }
    }
}

impl From<Array2<f64>> for Transform {
    fn from(matrix: Array2<f64>) -> Self {
        Transform::Matrix(matrix)
    }
}

type DecodedFn = dyn Fn(&[f64]) -> Vec<f64> + Send + Sync;

/// Function decoded from an ensemble's represented value
#[derive(Clone)]
pub struct DecodedFunction {
    output_dims: usize,
    func: Arc<DecodedFn>,
}

impl DecodedFunction {
    pub fn new<F>(output_dims: usize, func: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self {
            output_dims,
            func: Arc::new(func),
        }
    }

    pub fn output_dims(&self) -> usize {
        self.output_dims
    }

    pub fn call(&self, x: &[f64]) -> Vec<f64> {
        (self.func)(x)
    }
}

impl fmt::Debug for DecodedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedFunction")
            .field("output_dims", &self.output_dims)
            .finish_non_exhaustive()
    }
}

/// Requested connection, validated by [`Network::connect`](crate::Network::connect)
#[derive(Debug, Clone)]
pub struct ConnectionSpec {
    pub source: PortRef,
    pub target: PortRef,
    pub filter: Option<Filter>,
    pub transform: Transform,
    pub function: Option<DecodedFunction>,
}

impl ConnectionSpec {
    /// Identity connection with the default lowpass filter
    pub fn new(source: impl Into<PortRef>, target: impl Into<PortRef>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            filter: Some(Filter::default()),
            transform: Transform::Identity,
            function: None,
        }
    }

    /// `None` makes the connection an instantaneous pass-through
    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn transform(mut self, transform: impl Into<Transform>) -> Self {
        self.transform = transform.into();
        self
    }

    pub fn function(mut self, function: DecodedFunction) -> Self {
        self.function = Some(function);
        self
    }
}

/// Validated connection with resolved port indices
#[derive(Debug, Clone)]
pub struct Connection {
    pub source: PortRef,
    pub target: PortRef,
    pub filter: Option<Filter>,
    pub transform: Transform,
    pub function: Option<DecodedFunction>,
    pub source_indices: Vec<usize>,
    pub target_indices: Vec<usize>,
}

impl Connection {
    pub fn is_unfiltered(&self) -> bool {
        self.filter.is_none()
    }

    /// Width between function and transform
    pub fn size_mid(&self) -> usize {
        self.function
            .as_ref()
            .map_or(self.source_indices.len(), DecodedFunction::output_dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transform_shapes() {
        assert_eq!(Transform::Identity.size_out(3), Some(3));
        assert_eq!(Transform::Scalar(2.0).size_out(3), Some(3));
        let matrix = Transform::Matrix(Array2::ones((1, 3)));
        assert_eq!(matrix.size_out(3), Some(1));
        assert_eq!(matrix.size_out(2), None);
    }

    #[test]
    fn test_transform_apply() {
        assert_eq!(Transform::Scalar(2.0).apply(&[1.0, -1.0]), vec![2.0, -2.0]);
        let matrix = Transform::Matrix(array![[1.0, 2.0], [0.0, -1.0]]);
        assert_eq!(matrix.apply(&[3.0, 4.0]), vec![11.0, -4.0]);
    }

    #[test]
    fn test_spec_defaults_to_lowpass() {
        use crate::ids::NodeId;
        let spec = ConnectionSpec::new(NodeId(0), NodeId(1));
        assert_eq!(spec.filter, Some(Filter::Lowpass { tau: 0.005 }));
        assert!(spec.filter(None).filter.is_none());
    }
}
