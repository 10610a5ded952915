// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ensemble arrays
//!
//! A vector of width `n_ensembles * dimensions_per_ensemble` represented by
//! `n_ensembles` small ensembles side by side. Cheaper than one large
//! ensemble when the dimensions do not need to interact.
//!
//! ```text
//! input[0..d]   --> ens[0] --f--> output[0..k]
//! input[d..2d]  --> ens[1] --f--> output[k..2k]
//! ...
//! ```

use std::collections::BTreeMap;

use nef_neural::{derive_seed, Neurons};
use tracing::debug;

use crate::connection::{ConnectionSpec, DecodedFunction};
use crate::ensemble::{Ensemble, EnsembleOptions};
use crate::error::{GraphError, GraphResult};
use crate::ids::{EnsembleId, NodeId};
use crate::network::Network;
use crate::node::Node;
use crate::slice::{PortRef, Slice};

#[derive(Debug, Clone)]
pub struct EnsembleArray {
    label: String,
    input: NodeId,
    ensembles: Vec<EnsembleId>,
    dimensions_per_ensemble: usize,
    outputs: BTreeMap<String, NodeId>,
}

impl EnsembleArray {
    /// Build the array into `net`
    ///
    /// Every sub-ensemble gets `neurons` and a copy of `options`; an explicit
    /// seed is mixed with the ensemble index so siblings differ.
    ///
    /// # Errors
    /// `InvalidShape` for zero ensembles, plus any ensemble construction error
    pub fn new(
        net: &mut Network,
        label: impl Into<String>,
        neurons: Neurons,
        n_ensembles: usize,
        dimensions_per_ensemble: usize,
        options: EnsembleOptions,
    ) -> GraphResult<Self> {
        let label = label.into();
        if n_ensembles == 0 {
            return Err(GraphError::InvalidShape(format!(
                "ensemble array '{}' needs at least one ensemble",
                label
            )));
        }

        // Validate the shared configuration before touching the network
        let mut prototypes = Vec::with_capacity(n_ensembles);
        for i in 0..n_ensembles {
            let mut sub_options = options.clone();
            sub_options.seed = options.seed.map(|seed| derive_seed(seed, i as u64));
            prototypes.push(Ensemble::new(
                format!("{}[{}]", label, i),
                neurons,
                dimensions_per_ensemble,
                sub_options,
            )?);
        }

        let input = net.add_node(Node::passthrough(
            format!("{}.input", label),
            n_ensembles * dimensions_per_ensemble,
        ));

        let mut ensembles = Vec::with_capacity(n_ensembles);
        for (i, ensemble) in prototypes.into_iter().enumerate() {
            let id = net.add_ensemble(ensemble);
            let start = i * dimensions_per_ensemble;
            net.connect(
                ConnectionSpec::new(
                    input.slice(Slice::range(start, start + dimensions_per_ensemble)),
                    id,
                )
                .filter(None),
            )?;
            ensembles.push(id);
        }

        debug!(
            target: "nef-graph",
            "Built ensemble array '{}': {} x {}D, {} neurons each",
            label,
            n_ensembles,
            dimensions_per_ensemble,
            neurons.n_neurons
        );

        Ok(Self {
            label,
            input,
            ensembles,
            dimensions_per_ensemble,
            outputs: BTreeMap::new(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Input node, `n_ensembles * dimensions_per_ensemble` wide
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Sliced view of the input node
    pub fn input_slice(&self, slice: Slice) -> PortRef {
        self.input.slice(slice)
    }

    pub fn ensembles(&self) -> &[EnsembleId] {
        &self.ensembles
    }

    pub fn n_ensembles(&self) -> usize {
        self.ensembles.len()
    }

    pub fn dimensions_per_ensemble(&self) -> usize {
        self.dimensions_per_ensemble
    }

    pub fn dimensions(&self) -> usize {
        self.ensembles.len() * self.dimensions_per_ensemble
    }

    /// Decode `function` from every sub-ensemble into a new named output
    ///
    /// The output node is `n_ensembles * output_dims` wide; ensemble `i`
    /// writes slots `i * output_dims .. (i + 1) * output_dims`.
    ///
    /// # Errors
    /// `DuplicateOutput` if `name` is taken
    pub fn add_output<F>(
        &mut self,
        net: &mut Network,
        name: impl Into<String>,
        output_dims: usize,
        function: F,
    ) -> GraphResult<NodeId>
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.outputs.contains_key(&name) {
            return Err(GraphError::DuplicateOutput(name));
        }

        let output = net.add_node(Node::passthrough(
            format!("{}.{}", self.label, name),
            self.ensembles.len() * output_dims,
        ));
        let function = DecodedFunction::new(output_dims, function);
        for (i, &ensemble) in self.ensembles.iter().enumerate() {
            let start = i * output_dims;
            net.connect(
                ConnectionSpec::new(ensemble, output.slice(Slice::range(start, start + output_dims)))
                    .function(function.clone())
                    .filter(None),
            )?;
        }

        debug!(target: "nef-graph", "Registered output '{}' on '{}' ({}D per ensemble)", name, self.label, output_dims);
        self.outputs.insert(name, output);
        Ok(output)
    }

    /// Output node registered under `name`
    pub fn output(&self, name: &str) -> GraphResult<NodeId> {
        self.outputs
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownOutput(name.to_string()))
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }
}
