// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron population specification

use crate::models::{LIFParameters, NeuronType};

/// A neuron model together with a population size
///
/// # Example
/// ```
/// use nef_neural::Neurons;
///
/// let neurons = Neurons::lif(100);
/// assert_eq!(neurons.n_neurons, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neurons {
    pub neuron_type: NeuronType,
    pub n_neurons: usize,
}

impl Neurons {
    pub fn new(neuron_type: NeuronType, n_neurons: usize) -> Self {
        Self {
            neuron_type,
            n_neurons,
        }
    }

    /// LIF population with default time constants
    pub fn lif(n_neurons: usize) -> Self {
        Self::new(NeuronType::Lif(LIFParameters::default()), n_neurons)
    }

    pub fn rectified_linear(n_neurons: usize) -> Self {
        Self::new(NeuronType::RectifiedLinear, n_neurons)
    }

    /// Population that computes decoded functions exactly
    pub fn direct(n_neurons: usize) -> Self {
        Self::new(NeuronType::Direct, n_neurons)
    }
}
