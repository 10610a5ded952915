// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # nef-observability
//!
//! Logging setup shared by the ensemble-network crates, with per-crate
//! debug flag support.
//!
//! ## Features
//! - `file-logging`: Per-run rolling log files with retention (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Crate names accepted by `--debug-<crate>` and used as tracing targets
pub const KNOWN_CRATES: &[&str] = &[
    "nef-config",
    "nef-neural",
    "nef-graph",
    "nef-networks",
    "nef-observability",
];
