// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, NefConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no path is given
pub const CONFIG_FILE_NAME: &str = "nef_configuration.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `NEF_CONFIG_PATH` environment variable
/// 2. Current working directory: `./nef_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEF_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by NEF_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet NEF_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NefConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NefConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    crate::validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NEF_LOG_LEVEL` -> `system.log_level`
/// - `NEF_SEED` -> `system.seed`
/// - `NEF_NEURON_TYPE` -> `ensemble.neuron_type`
/// - `NEF_NEURONS` -> `ensemble.n_neurons`
/// - `NEF_RADIUS` -> `product.radius`
/// - `NEF_DIMENSIONS` -> `product.dimensions`
pub fn apply_environment_overrides(config: &mut NefConfig) {
    let vars: HashMap<String, String> = [
        ("log_level", "NEF_LOG_LEVEL"),
        ("seed", "NEF_SEED"),
        ("neuron_type", "NEF_NEURON_TYPE"),
        ("neurons", "NEF_NEURONS"),
        ("radius", "NEF_RADIUS"),
        ("dimensions", "NEF_DIMENSIONS"),
    ]
    .iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();
    apply_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"neurons": "200", "radius": "2.0"}`)
pub fn apply_cli_overrides(config: &mut NefConfig, cli_args: &HashMap<String, String>) {
    apply_overrides(config, cli_args);
}

/// Unparseable values are ignored and leave the current setting in place
fn apply_overrides(config: &mut NefConfig, values: &HashMap<String, String>) {
    if let Some(value) = values.get("log_level") {
        config.system.log_level = value.clone();
    }
    if let Some(seed) = values.get("seed").and_then(|v| v.parse::<u64>().ok()) {
        config.system.seed = seed;
    }
    if let Some(value) = values.get("neuron_type") {
        config.ensemble.neuron_type = value.to_lowercase();
    }
    if let Some(n) = values.get("neurons").and_then(|v| v.parse::<usize>().ok()) {
        config.ensemble.n_neurons = n;
    }
    if let Some(radius) = values.get("radius").and_then(|v| v.parse::<f64>().ok()) {
        config.product.radius = radius;
    }
    if let Some(dims) = values.get("dimensions").and_then(|v| v.parse::<usize>().ok()) {
        config.product.dimensions = dims;
    }
}
