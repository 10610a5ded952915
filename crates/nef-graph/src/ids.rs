// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed handles into a [`Network`](crate::Network) arena

use core::fmt;

use crate::slice::{PortRef, Slice};

/// Handle to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Handle to an ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnsembleId(pub(crate) usize);

/// Handle to a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) usize);

/// Any object that can be a connection endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    Node(NodeId),
    Ensemble(EnsembleId),
}

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Whole-width port of this node
    pub fn port(self) -> PortRef {
        PortRef::new(self)
    }

    /// Sliced port of this node
    pub fn slice(self, slice: Slice) -> PortRef {
        PortRef::new(self).sliced(slice)
    }
}

impl EnsembleId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn port(self) -> PortRef {
        PortRef::new(self)
    }

    pub fn slice(self, slice: Slice) -> PortRef {
        PortRef::new(self).sliced(slice)
    }
}

impl ConnectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<NodeId> for ObjectId {
    fn from(id: NodeId) -> Self {
        ObjectId::Node(id)
    }
}

impl From<EnsembleId> for ObjectId {
    fn from(id: EnsembleId) -> Self {
        ObjectId::Ensemble(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::Node(id) => write!(f, "node#{}", id.0),
            ObjectId::Ensemble(id) => write!(f, "ensemble#{}", id.0),
        }
    }
}
