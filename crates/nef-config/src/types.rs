// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `nef_configuration.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NefConfig {
    pub system: SystemConfig,
    pub ensemble: EnsembleConfig,
    pub product: ProductConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
    /// Seed of the top-level network
    pub seed: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: 0,
        }
    }
}

/// Default ensemble parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// `lif`, `rectified_linear` or `direct`
    pub neuron_type: String,
    pub n_neurons: usize,
    pub max_rate_low: f64,
    pub max_rate_high: f64,
    pub intercept_low: f64,
    pub intercept_high: f64,
    /// LIF membrane time constant (seconds)
    pub tau_rc: f64,
    /// LIF refractory period (seconds)
    pub tau_ref: f64,
    pub regularization: f64,
    /// 0 = size from neuron count and dimensionality
    pub n_eval_points: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            neuron_type: "lif".to_string(),
            n_neurons: 100,
            max_rate_low: 200.0,
            max_rate_high: 400.0,
            intercept_low: -1.0,
            intercept_high: 1.0,
            tau_rc: 0.02,
            tau_ref: 0.002,
            regularization: 0.1,
            n_eval_points: 0,
        }
    }
}

/// Product network defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductConfig {
    pub dimensions: usize,
    pub radius: f64,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            dimensions: 1,
            radius: 1.0,
        }
    }
}

/// Logging output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `text` or `json`
    pub format: String,
    /// Write rolling log files in addition to the console
    pub file_logging: bool,
    pub log_dir: String,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            file_logging: false,
            log_dir: "./logs".to_string(),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
