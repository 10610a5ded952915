// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that values are within valid ranges and consistent with each
//! other. All problems are collected before failing.

use crate::{ConfigError, ConfigResult, NefConfig};

/// Neuron types the graph layer understands
pub const KNOWN_NEURON_TYPES: &[&str] = &["lif", "rectified_linear", "direct"];

/// Log formats the observability layer understands
pub const KNOWN_LOG_FORMATS: &[&str] = &["text", "json"];

/// Longest log retention accepted, in days
pub const MAX_RETENTION_DAYS: u64 = 36_500;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    InvalidRange { field: String, low: f64, high: f64 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { field, low, high } => {
                write!(f, "Range {} = [{}, {}] is empty or unordered", field, low, high)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &NefConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every validation problem in `config`
pub fn collect_errors(config: &NefConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_ensemble(config, &mut errors);
    validate_product(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn invalid(errors: &mut Vec<ConfigValidationError>, field: &str, reason: impl Into<String>) {
    errors.push(ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    });
}

fn validate_ensemble(config: &NefConfig, errors: &mut Vec<ConfigValidationError>) {
    let ens = &config.ensemble;

    if !KNOWN_NEURON_TYPES.contains(&ens.neuron_type.as_str()) {
        invalid(
            errors,
            "ensemble.neuron_type",
            format!("'{}' is not one of {:?}", ens.neuron_type, KNOWN_NEURON_TYPES),
        );
    }
    if ens.n_neurons == 0 {
        invalid(errors, "ensemble.n_neurons", "must be at least 1");
    }

    if !(ens.max_rate_low > 0.0) || ens.max_rate_low > ens.max_rate_high {
        errors.push(ConfigValidationError::InvalidRange {
            field: "ensemble.max_rate".to_string(),
            low: ens.max_rate_low,
            high: ens.max_rate_high,
        });
    }
    if ens.intercept_low > ens.intercept_high || ens.intercept_low < -1.0 || ens.intercept_high > 1.0 {
        errors.push(ConfigValidationError::InvalidRange {
            field: "ensemble.intercept".to_string(),
            low: ens.intercept_low,
            high: ens.intercept_high,
        });
    }

    if !(ens.tau_rc > 0.0) {
        invalid(errors, "ensemble.tau_rc", "must be positive");
    }
    if ens.tau_ref < 0.0 {
        invalid(errors, "ensemble.tau_ref", "must be non-negative");
    } else if ens.neuron_type == "lif" && ens.tau_ref > 0.0 && ens.max_rate_high >= 1.0 / ens.tau_ref {
        invalid(
            errors,
            "ensemble.max_rate_high",
            format!("{} Hz is unreachable with tau_ref = {}", ens.max_rate_high, ens.tau_ref),
        );
    }

    if !(ens.regularization >= 0.0) {
        invalid(errors, "ensemble.regularization", "must be non-negative");
    }
}

fn validate_product(config: &NefConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.product.dimensions == 0 {
        invalid(errors, "product.dimensions", "must be at least 1");
    }
    if !(config.product.radius > 0.0) {
        invalid(errors, "product.radius", "must be positive");
    }
}

fn validate_logging(config: &NefConfig, errors: &mut Vec<ConfigValidationError>) {
    if !KNOWN_LOG_FORMATS.contains(&config.logging.format.as_str()) {
        invalid(
            errors,
            "logging.format",
            format!("'{}' is not one of {:?}", config.logging.format, KNOWN_LOG_FORMATS),
        );
    }
    if config.logging.file_logging && config.logging.log_dir.is_empty() {
        invalid(errors, "logging.log_dir", "required when file_logging is enabled");
    }
    if config.logging.retention_days > MAX_RETENTION_DAYS {
        invalid(
            errors,
            "logging.retention_days",
            format!("{} exceeds the maximum of {}", config.logging.retention_days, MAX_RETENTION_DAYS),
        );
    }
    if config.logging.retention_runs == 0 {
        invalid(errors, "logging.retention_runs", "must keep at least the current run");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&NefConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let mut config = NefConfig::default();
        config.ensemble.neuron_type = "izhikevich".to_string();
        config.ensemble.max_rate_low = 500.0;
        config.ensemble.max_rate_high = 100.0;
        config.product.radius = 0.0;

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 3);

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("ensemble.neuron_type"));
        assert!(message.contains("product.radius"));
    }

    #[test]
    fn test_logging_retention_bounds() {
        let mut config = NefConfig::default();
        config.logging.retention_days = MAX_RETENTION_DAYS;
        assert!(collect_errors(&config).is_empty());

        config.logging.retention_days = 100_000_000;
        config.logging.retention_runs = 0;
        let fields: Vec<_> = collect_errors(&config)
            .into_iter()
            .filter_map(|e| match e {
                ConfigValidationError::InvalidValue { field, .. } => Some(field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec!["logging.retention_days", "logging.retention_runs"]);
    }

    #[test]
    fn test_unreachable_lif_rate() {
        let mut config = NefConfig::default();
        config.ensemble.max_rate_high = 600.0;
        let errors = collect_errors(&config);
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidValue { field, .. } if field == "ensemble.max_rate_high"
        )));

        config.ensemble.neuron_type = "rectified_linear".to_string();
        assert!(collect_errors(&config).is_empty());
    }
}
