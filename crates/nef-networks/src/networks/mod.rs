// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Prebuilt subnetworks

pub mod product;

pub use product::{
    product_encoders, Product, DEFAULT_DOT_PRODUCT_SCALE, DEFAULT_RADIUS, PRODUCT_OUTPUT,
};
