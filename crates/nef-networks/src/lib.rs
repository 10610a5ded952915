// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Reusable subnetworks

Subnetworks are built into an existing [`nef_graph::Network`] and expose
their ports as node handles, so they can be wired into larger models like
any other node.

- [`Product`]: elementwise product of two vectors, plus the transform that
  turns it into a dot product
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod networks;

pub use networks::{
    product_encoders, Product, DEFAULT_DOT_PRODUCT_SCALE, DEFAULT_RADIUS, PRODUCT_OUTPUT,
};
