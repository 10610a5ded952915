// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Non-neural nodes: named, fixed-width signal interfaces

/// What a node emits
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    /// Emits the sum of its inputs
    Passthrough,
    /// Emits a fixed vector and takes no input
    Constant(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub size_in: usize,
    pub output: NodeOutput,
}

impl Node {
    /// Node relaying `size` input dimensions unchanged
    ///
    /// # Example
    /// ```
    /// use nef_graph::Node;
    ///
    /// let a = Node::passthrough("A", 3);
    /// assert_eq!(a.size_in, 3);
    /// assert_eq!(a.size_out(), 3);
    /// ```
    pub fn passthrough(label: impl Into<String>, size: usize) -> Self {
        Self {
            label: label.into(),
            size_in: size,
            output: NodeOutput::Passthrough,
        }
    }

    /// Source node with a fixed output
    pub fn constant(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            size_in: 0,
            output: NodeOutput::Constant(values),
        }
    }

    pub fn size_out(&self) -> usize {
        match &self.output {
            NodeOutput::Passthrough => self.size_in,
            NodeOutput::Constant(values) => values.len(),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.output, NodeOutput::Constant(_))
    }
}
