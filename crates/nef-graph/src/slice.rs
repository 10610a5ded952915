// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Strided slices of object ports
//!
//! A [`Slice`] selects `start, start + step, ...` below `stop` (or the
//! object width when `stop` is open). `Slice::strided(0, 2)` picks the
//! even sub-dimensions, `Slice::strided(1, 2)` the odd ones.

use core::fmt;

use crate::error::{GraphError, GraphResult};
use crate::ids::{EnsembleId, NodeId, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: usize,
    pub stop: Option<usize>,
    pub step: usize,
}

impl Slice {
    /// Every index
    pub const fn full() -> Self {
        Self {
            start: 0,
            stop: None,
            step: 1,
        }
    }

    /// Contiguous `start..stop`
    pub const fn range(start: usize, stop: usize) -> Self {
        Self {
            start,
            stop: Some(stop),
            step: 1,
        }
    }

    /// `start, start + step, ...` to the end
    pub const fn strided(start: usize, step: usize) -> Self {
        Self {
            start,
            stop: None,
            step,
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    /// Resolve against an object of width `size`
    ///
    /// # Errors
    /// `InvalidShape` for a zero step, `SliceOutOfRange` when `start` or an
    /// explicit `stop` lies beyond `size`
    pub fn indices(&self, size: usize) -> GraphResult<Vec<usize>> {
        if self.step == 0 {
            return Err(GraphError::InvalidShape(format!("slice {} has zero step", self)));
        }
        let stop = self.stop.unwrap_or(size);
        if self.start > size || stop > size {
            return Err(GraphError::SliceOutOfRange {
                object: String::new(),
                slice: self.to_string(),
                size,
            });
        }
        Ok((self.start..stop).step_by(self.step).collect())
    }
}

impl Default for Slice {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stop {
            Some(stop) => write!(f, "[{}:{}:{}]", self.start, stop, self.step),
            None => write!(f, "[{}::{}]", self.start, self.step),
        }
    }
}

/// Connection endpoint: an object and the part of it being addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRef {
    pub object: ObjectId,
    pub slice: Slice,
}

impl PortRef {
    pub fn new(object: impl Into<ObjectId>) -> Self {
        Self {
            object: object.into(),
            slice: Slice::full(),
        }
    }

    pub fn sliced(mut self, slice: Slice) -> Self {
        self.slice = slice;
        self
    }
}

impl From<ObjectId> for PortRef {
    fn from(object: ObjectId) -> Self {
        PortRef::new(object)
    }
}

impl From<NodeId> for PortRef {
    fn from(id: NodeId) -> Self {
        PortRef::new(id)
    }
}

impl From<EnsembleId> for PortRef {
    fn from(id: EnsembleId) -> Self {
        PortRef::new(id)
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slice.is_full() {
            write!(f, "{}", self.object)
        } else {
            write!(f, "{}{}", self.object, self.slice)
        }
    }
}
