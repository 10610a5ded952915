// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Network graph for ensemble networks
//!
//! The building blocks networks are composed from:
//! - **Node**: named, fixed-width signal interface (passthrough or constant)
//! - **Ensemble**: neuron population representing a vector
//! - **EnsembleArray**: side-by-side ensembles with named decoded outputs
//! - **Connection**: directed link with optional filter, function and transform
//! - **Evaluator**: steady-state values of an acyclic network
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use nef_graph::{ConnectionSpec, Evaluator, Network, Node};
//!
//! let mut net = Network::new("demo");
//! let a = net.add_node(Node::constant("a", vec![1.0, 2.0]));
//! let b = net.add_node(Node::passthrough("b", 2));
//! net.connect(ConnectionSpec::new(a, b).filter(None)).unwrap();
//!
//! let values = Evaluator::build(&net).unwrap().evaluate(&HashMap::new()).unwrap();
//! assert_eq!(values.node(b).unwrap(), &[1.0, 2.0]);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod connection;
pub mod ensemble;
pub mod ensemble_array;
pub mod error;
pub mod evaluator;
pub mod ids;
pub mod network;
pub mod node;
pub mod slice;

pub use config::neurons_from_config;
pub use connection::{Connection, ConnectionSpec, DecodedFunction, Filter, Transform};
pub use ensemble::{Ensemble, EnsembleOptions};
pub use ensemble_array::EnsembleArray;
pub use error::{GraphError, GraphResult};
pub use evaluator::{Evaluator, Values};
pub use ids::{ConnectionId, EnsembleId, NodeId, ObjectId};
pub use network::Network;
pub use node::{Node, NodeOutput};
pub use slice::{PortRef, Slice};

// Re-export the numerics the public API exposes
pub use nef_neural::{NeuronType, Neurons};
