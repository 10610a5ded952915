// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Network arena
//!
//! A [`Network`] owns every node, ensemble and connection. Composite
//! networks such as ensemble arrays are built *into* a `&mut Network` and
//! keep only handles, so a subnetwork embedded in a larger model shares
//! the parent's arena.

use tracing::{debug, trace};

use crate::connection::{Connection, ConnectionSpec};
use crate::ensemble::Ensemble;
use crate::error::{GraphError, GraphResult};
use crate::ids::{ConnectionId, EnsembleId, NodeId, ObjectId};
use crate::node::Node;
use crate::slice::PortRef;

/// Seed used when a network is not given one
pub const DEFAULT_NETWORK_SEED: u64 = 0;

#[derive(Debug, Clone)]
pub struct Network {
    pub label: String,
    pub seed: u64,
    nodes: Vec<Node>,
    ensembles: Vec<Ensemble>,
    connections: Vec<Connection>,
}

impl Network {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_seed(label, DEFAULT_NETWORK_SEED)
    }

    pub fn with_seed(label: impl Into<String>, seed: u64) -> Self {
        Self {
            label: label.into(),
            seed,
            nodes: Vec::new(),
            ensembles: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        trace!(target: "nef-graph", "Added node '{}' ({} -> {})", node.label, node.size_in, node.size_out());
        self.nodes.push(node);
        id
    }

    pub fn add_ensemble(&mut self, ensemble: Ensemble) -> EnsembleId {
        let id = EnsembleId(self.ensembles.len());
        trace!(
            target: "nef-graph",
            "Added ensemble '{}' ({} neurons, {}D)",
            ensemble.label,
            ensemble.neurons.n_neurons,
            ensemble.dimensions
        );
        self.ensembles.push(ensemble);
        id
    }

    /// Validate and add a connection
    ///
    /// # Errors
    /// * `UnknownObject` for handles from another network
    /// * `SliceOutOfRange` / `InvalidShape` for bad slices
    /// * `InvalidConnection` for functions on non-ensemble sources, constant
    ///   targets, or widths that do not line up
    pub fn connect(&mut self, spec: ConnectionSpec) -> GraphResult<ConnectionId> {
        let source_size = self.size_out(spec.source.object)?;
        let target_size = self.size_in(spec.target.object)?;
        let source_indices = self.resolve(&spec.source, source_size)?;
        let target_indices = self.resolve(&spec.target, target_size)?;

        if let ObjectId::Node(id) = spec.target.object {
            if self.nodes[id.0].is_constant() {
                return Err(GraphError::InvalidConnection(format!(
                    "constant node '{}' cannot receive input",
                    self.nodes[id.0].label
                )));
            }
        }

        let size_mid = match (&spec.function, spec.source.object) {
            (Some(function), ObjectId::Ensemble(_)) => function.output_dims(),
            (Some(_), ObjectId::Node(_)) => {
                return Err(GraphError::InvalidConnection(format!(
                    "functions can only be decoded from ensembles (source {})",
                    spec.source
                )));
            }
            (None, _) => source_indices.len(),
        };

        let size_out = spec.transform.size_out(size_mid).ok_or_else(|| {
            GraphError::InvalidConnection(format!(
                "transform does not accept {} inputs ({} -> {})",
                size_mid, spec.source, spec.target
            ))
        })?;
        if size_out != target_indices.len() {
            return Err(GraphError::InvalidConnection(format!(
                "{} produces {} dimensions but {} accepts {}",
                spec.source,
                size_out,
                spec.target,
                target_indices.len()
            )));
        }

        let id = ConnectionId(self.connections.len());
        debug!(
            target: "nef-graph",
            "Connected {} -> {} ({} dims, filter={:?})",
            self.label_of(spec.source.object),
            self.label_of(spec.target.object),
            size_out,
            spec.filter
        );
        self.connections.push(Connection {
            source: spec.source,
            target: spec.target,
            filter: spec.filter,
            transform: spec.transform,
            function: spec.function,
            source_indices,
            target_indices,
        });
        Ok(id)
    }

    fn resolve(&self, port: &PortRef, size: usize) -> GraphResult<Vec<usize>> {
        port.slice.indices(size).map_err(|err| match err {
            GraphError::SliceOutOfRange { slice, size, .. } => GraphError::SliceOutOfRange {
                object: self.label_of(port.object).to_string(),
                slice,
                size,
            },
            other => other,
        })
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| GraphError::UnknownObject(ObjectId::from(id).to_string()))
    }

    pub fn ensemble(&self, id: EnsembleId) -> GraphResult<&Ensemble> {
        self.ensembles
            .get(id.0)
            .ok_or_else(|| GraphError::UnknownObject(ObjectId::from(id).to_string()))
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn ensembles(&self) -> impl Iterator<Item = (EnsembleId, &Ensemble)> {
        self.ensembles.iter().enumerate().map(|(i, e)| (EnsembleId(i), e))
    }

    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .map(|(i, c)| (ConnectionId(i), c))
    }

    /// Connections ending at `object`
    pub fn connections_into(
        &self,
        object: ObjectId,
    ) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections()
            .filter(move |(_, c)| c.target.object == object)
    }

    /// Connections starting at `object`
    pub fn connections_from(
        &self,
        object: ObjectId,
    ) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections()
            .filter(move |(_, c)| c.source.object == object)
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_ensembles(&self) -> usize {
        self.ensembles.len()
    }

    pub fn n_connections(&self) -> usize {
        self.connections.len()
    }

    /// Width an object emits
    pub fn size_out(&self, object: ObjectId) -> GraphResult<usize> {
        match object {
            ObjectId::Node(id) => Ok(self.node(id)?.size_out()),
            ObjectId::Ensemble(id) => Ok(self.ensemble(id)?.dimensions),
        }
    }

    /// Width an object accepts
    pub fn size_in(&self, object: ObjectId) -> GraphResult<usize> {
        match object {
            ObjectId::Node(id) => Ok(self.node(id)?.size_in),
            ObjectId::Ensemble(id) => Ok(self.ensemble(id)?.dimensions),
        }
    }

    pub fn label_of(&self, object: ObjectId) -> &str {
        match object {
            ObjectId::Node(id) => self.nodes.get(id.0).map_or("?", |n| n.label.as_str()),
            ObjectId::Ensemble(id) => self.ensembles.get(id.0).map_or("?", |e| e.label.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{DecodedFunction, Transform};
    use crate::ensemble::EnsembleOptions;
    use crate::slice::Slice;
    use nef_neural::Neurons;
    use ndarray::Array2;
    use proptest::prelude::*;

    #[test]
    fn test_connect_resolves_slices() {
        let mut net = Network::new("test");
        let a = net.add_node(Node::passthrough("a", 2));
        let b = net.add_node(Node::passthrough("b", 4));
        let id = net
            .connect(ConnectionSpec::new(a, b.slice(Slice::strided(1, 2))).filter(None))
            .unwrap();
        let conn = net.connection(id).unwrap();
        assert_eq!(conn.source_indices, vec![0, 1]);
        assert_eq!(conn.target_indices, vec![1, 3]);
        assert!(conn.is_unfiltered());
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let mut net = Network::new("test");
        let a = net.add_node(Node::passthrough("a", 3));
        let b = net.add_node(Node::passthrough("b", 2));
        let err = net.connect(ConnectionSpec::new(a, b)).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection(_)));

        let ok = net.connect(
            ConnectionSpec::new(a, b.slice(Slice::range(0, 1))).transform(Array2::ones((1, 3))),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_function_requires_ensemble_source() {
        let mut net = Network::new("test");
        let a = net.add_node(Node::passthrough("a", 2));
        let b = net.add_node(Node::passthrough("b", 1));
        let f = DecodedFunction::new(1, |x| vec![x[0] * x[1]]);
        let err = net.connect(ConnectionSpec::new(a, b).function(f.clone())).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection(_)));

        let ens = Ensemble::new("e", Neurons::lif(10), 2, EnsembleOptions::default()).unwrap();
        let e = net.add_ensemble(ens);
        assert!(net.connect(ConnectionSpec::new(e, b).function(f)).is_ok());
    }

    #[test]
    fn test_constant_target_rejected() {
        let mut net = Network::new("test");
        let c = net.add_node(Node::constant("c", vec![1.0]));
        let d = net.add_node(Node::constant("d", vec![1.0]));
        let err = net
            .connect(ConnectionSpec::new(c, d).transform(Transform::Matrix(Array2::zeros((0, 1)))))
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidConnection(_)));
    }

    #[test]
    fn test_slice_error_names_object() {
        let mut net = Network::new("test");
        let a = net.add_node(Node::passthrough("alpha", 2));
        let b = net.add_node(Node::passthrough("beta", 2));
        let err = net
            .connect(ConnectionSpec::new(a.slice(Slice::range(0, 3)), b))
            .unwrap_err();
        match err {
            GraphError::SliceOutOfRange { object, size, .. } => {
                assert_eq!(object, "alpha");
                assert_eq!(size, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    proptest! {
        #[test]
        fn prop_connect_requires_matching_widths(
            source_size in 1usize..8,
            target_size in 1usize..8,
            rows in 1usize..8,
        ) {
            let mut net = Network::new("widths");
            let a = net.add_node(Node::passthrough("a", source_size));
            let b = net.add_node(Node::passthrough("b", target_size));

            let identity = net.connect(ConnectionSpec::new(a, b));
            prop_assert_eq!(identity.is_ok(), source_size == target_size);

            let matrix = Transform::Matrix(Array2::zeros((rows, source_size)));
            let mapped = net.connect(ConnectionSpec::new(a, b).transform(matrix));
            prop_assert_eq!(mapped.is_ok(), rows == target_size);

            let expected = usize::from(source_size == target_size) + usize::from(rows == target_size);
            prop_assert_eq!(net.n_connections(), expected);
            if let Err(err) = identity {
                let is_invalid = matches!(err, GraphError::InvalidConnection(_));
                prop_assert!(is_invalid);
            }
        }
    }
}
