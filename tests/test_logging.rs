// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialisation from configuration
//!
//! Kept in its own test binary: the global subscriber can only be set once
//! per process.

use nef::prelude::*;
use nef_observability::init_logging_default;

#[test]
fn test_logging_installs_once_from_config() {
    let mut config = NefConfig::default();
    config.system.log_level = "debug".to_string();
    config.logging.format = "json".to_string();

    let flags = CrateDebugFlags::from_args(vec![
        "product_probe".to_string(),
        "--debug-nef-graph".to_string(),
    ]);
    assert!(flags.is_enabled("nef-graph"));

    let guard = init_logging(&flags, &nef::logging_config(&config)).unwrap();
    assert!(guard.log_dir().is_none());

    tracing::debug!(target: "nef-graph", "logging is live");

    assert!(init_logging_default(&CrateDebugFlags::default()).is_err());
}
