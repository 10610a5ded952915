// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-nef-graph`, `--debug-nef-networks`, etc.
//! to raise a single crate to debug level.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates with debug logging enabled
///
/// # Example
/// ```rust
/// use nef_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-nef-graph".to_string()]);
/// assert!(flags.is_enabled("nef-graph"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// `--debug-all` enables all known crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }
        flags
    }

    /// Merge a `NEF_DEBUG`-style value: `all` or comma-separated crate names
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            self.enabled_crates.insert(crate_name.to_string());
        }
    }

    fn enable_all(&mut self) {
        self.enabled_crates
            .extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `tracing::Level::DEBUG` if enabled, `INFO` otherwise
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Filter string for `EnvFilter`
    ///
    /// Format: `nef-graph=debug,nef-networks=debug,<default_level>`.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        self.enabled_crates
            .iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .chain(std::iter::once(default_level.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Debug flags from the process arguments and the `NEF_DEBUG` variable
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var("NEF_DEBUG") {
        flags.merge_env_value(&value);
    }
    flags
}

/// Help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  NEF_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  NEF_DEBUG=all                             Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-nef-graph".to_string()]);
        assert!(flags.is_enabled("nef-graph"));
        assert!(!flags.is_enabled("nef-networks"));
    }

    #[test]
    fn test_non_flag_arguments_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "product_probe".to_string(),
            "--neurons".to_string(),
            "200".to_string(),
        ]);
        assert!(!flags.any_enabled());
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_env_value_merge() {
        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value("nef-neural, nef-config,");
        assert!(flags.is_enabled("nef-neural"));
        assert!(flags.is_enabled("nef-config"));
        assert_eq!(flags.enabled_crates.len(), 2);
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-nef-networks".to_string(),
            "--debug-nef-graph".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("warn"),
            "nef-graph=debug,nef-networks=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-nef-graph".to_string()]);
        assert_eq!(flags.log_level("nef-graph"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("nef-neural"), tracing::Level::INFO);
    }
}
