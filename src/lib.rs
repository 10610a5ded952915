// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # nef - Neural ensemble networks
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`config`]: TOML configuration with environment and CLI overrides
//! - [`neural`]: neuron models, tuning curves, decoder solver
//! - [`graph`]: network graph, ensemble arrays, steady-state evaluator
//! - [`networks`]: prebuilt subnetworks such as [`networks::Product`]
//! - [`observability`]: logging initialisation and per-crate debug flags
//!
//! It also wires configuration into the other layers, so a tool can go from
//! `nef_configuration.toml` to an evaluated network in a few calls.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use nef::prelude::*;
//!
//! let mut config = NefConfig::default();
//! config.ensemble.neuron_type = "direct".to_string();
//! config.product.dimensions = 2;
//!
//! let mut net = nef::network_from_config("probe", &config);
//! let product = nef::product_from_config(&mut net, &config)?;
//!
//! let inputs = HashMap::from([
//!     (product.a(), vec![0.5, -1.0]),
//!     (product.b(), vec![0.5, 0.25]),
//! ]);
//! let values = Evaluator::build(&net)?.evaluate(&inputs)?;
//! assert_eq!(values.node(product.output()), Some(&[0.25, -0.25][..]));
//! # Ok::<(), GraphError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nef_config as config;
pub use nef_graph as graph;
pub use nef_networks as networks;
pub use nef_neural as neural;
pub use nef_observability as observability;

use nef_config::NefConfig;
use nef_graph::{neurons_from_config, EnsembleOptions, GraphResult, Network};
use nef_networks::Product;
use nef_observability::{FileLoggingConfig, LogFormat};
use std::path::PathBuf;

/// Commonly used items
pub mod prelude {
    pub use nef_config::{load_config, NefConfig};
    pub use nef_graph::{
        ConnectionSpec, EnsembleArray, EnsembleOptions, Evaluator, GraphError, GraphResult,
        Network, NeuronType, Neurons, Node, NodeId, Slice, Values,
    };
    pub use nef_networks::{Product, DEFAULT_RADIUS};
    pub use nef_observability::{init_logging, parse_debug_flags, CrateDebugFlags};
}

/// Empty network seeded from `[system] seed`
pub fn network_from_config(label: impl Into<String>, config: &NefConfig) -> Network {
    Network::with_seed(label, config.system.seed)
}

/// Product network sized by `[product]` with `[ensemble]` populations
///
/// # Errors
/// Unknown neuron types and every error [`Product::new`] reports
pub fn product_from_config(net: &mut Network, config: &NefConfig) -> GraphResult<Product> {
    let neurons = neurons_from_config(&config.ensemble)?;
    Product::new(
        net,
        neurons,
        config.product.dimensions,
        config.product.radius,
        EnsembleOptions::from(&config.ensemble),
    )
}

/// Logging settings described by `[system]` and `[logging]`
///
/// An unrecognised format falls back to text; validated configs never have one.
pub fn logging_config(config: &NefConfig) -> nef_observability::LoggingConfig {
    let logging = &config.logging;
    nef_observability::LoggingConfig {
        level: config.system.log_level.clone(),
        format: LogFormat::parse(&logging.format).unwrap_or(LogFormat::Text),
        file: logging.file_logging.then(|| FileLoggingConfig {
            log_dir: PathBuf::from(&logging.log_dir),
            retention_days: logging.retention_days,
            retention_runs: logging.retention_runs,
        }),
    }
}
