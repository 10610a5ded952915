// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output is always installed. With the `file-logging` feature and a
//! [`FileLoggingConfig`](crate::FileLoggingConfig), every run also gets its own timestamped folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       ├── nef-graph.log
//!       ├── nef-networks.log
//!       └── nef.log (combined)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{FileLoggingConfig, LogFormat, LoggingConfig};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps file writers alive; logs are flushed when this is dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Install the global subscriber
///
/// The console filter is `config.level` with every crate named in
/// `debug_flags` raised to debug. `RUST_LOG`, when set, replaces it.
///
/// # Errors
/// Fails if the filter does not parse, the run folder cannot be created, or
/// a global subscriber is already installed
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = console_filter(debug_flags, &config.level)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg_attr(not(feature = "file-logging"), allow(unused_mut))]
    let mut guard = LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: Vec::new(),
        log_dir: None,
    };

    #[cfg_attr(feature = "file-logging", allow(unused_mut))]
    let mut file_requested_without_support = false;
    if let Some(file_config) = &config.file {
        #[cfg(feature = "file-logging")]
        {
            let run_folder = add_file_layers(&mut layers, &mut guard, debug_flags, file_config, &config.level)?;
            guard.log_dir = Some(run_folder);
        }
        #[cfg(not(feature = "file-logging"))]
        {
            let _ = file_config;
            file_requested_without_support = true;
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    if file_requested_without_support {
        tracing::warn!(
            target: "nef-observability",
            "File logging requested but the file-logging feature is disabled; logging to console only"
        );
    }
    Ok(guard)
}

/// Console-only logging at `info` with the given debug flags
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default())
}

fn console_filter(debug_flags: &CrateDebugFlags, level: &str) -> Result<EnvFilter> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    let directives = debug_flags.to_filter_string(level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))
}

#[cfg(feature = "file-logging")]
fn add_file_layers(
    layers: &mut Vec<BoxedLayer>,
    guard: &mut LoggingGuard,
    debug_flags: &CrateDebugFlags,
    file_config: &FileLoggingConfig,
    level: &str,
) -> Result<PathBuf> {
    use tracing_appender::rolling;

    let run_folder = prepare_run_folder(file_config, Utc::now())?;

    for crate_name in crate::KNOWN_CRATES {
        let appender = rolling::daily(&run_folder, format!("{}.log", crate_name));
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        guard._file_guards.push(file_guard);

        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(EnvFilter::try_new(format!("{}=debug,off", crate_name))?)
                .boxed(),
        );
    }

    let combined = rolling::daily(&run_folder, "nef.log");
    let (writer, file_guard) = tracing_appender::non_blocking(combined);
    guard._file_guards.push(file_guard);
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::try_new(debug_flags.to_filter_string(level))?)
            .boxed(),
    );

    Ok(run_folder)
}

/// Apply retention to earlier runs, then create the folder for this run
///
/// The new folder counts towards `retention_runs` but is never removed, even
/// when `retention_runs` is 0.
#[cfg_attr(not(feature = "file-logging"), allow(dead_code))]
fn prepare_run_folder(file_config: &FileLoggingConfig, now: DateTime<Utc>) -> Result<PathBuf> {
    cleanup_runs(
        &file_config.log_dir,
        now,
        file_config.retention_days,
        file_config.retention_runs.saturating_sub(1),
    )?;

    let timestamp = now.format(RUN_TIMESTAMP_FORMAT);
    let run_folder = file_config.log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Remove run folders under `base_log_dir` that fall outside the retention policy
///
/// Folders older than `retention_days` go first; of the rest only the newest
/// `retention_runs` are kept. Entries not named `run_<timestamp>` are left
/// alone. Returns the number of folders removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    cleanup_runs(base_log_dir, Utc::now(), retention_days, retention_runs)
}

fn cleanup_runs(
    base_log_dir: &Path,
    now: DateTime<Utc>,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let mut runs = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let started = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_timestamp);
        if let Some(started) = started {
            runs.push((path, started));
        }
    }

    let mut removed = 0;
    for path in expired_runs(runs, now, retention_days, retention_runs) {
        match std::fs::remove_dir_all(&path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }
    Ok(removed)
}

fn parse_run_timestamp(dir_name: &str) -> Option<DateTime<Utc>> {
    let timestamp = dir_name.strip_prefix(RUN_PREFIX)?;
    NaiveDateTime::parse_from_str(timestamp, RUN_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn expired_runs(
    mut runs: Vec<(PathBuf, DateTime<Utc>)>,
    now: DateTime<Utc>,
    retention_days: u64,
    retention_runs: usize,
) -> Vec<PathBuf> {
    // A horizon beyond the representable range means nothing expires by age
    let cutoff = i64::try_from(retention_days)
        .ok()
        .and_then(chrono::Duration::try_days)
        .and_then(|age| now.checked_sub_signed(age));
    runs.sort_by_key(|(_, started)| *started);

    let (expired, recent): (Vec<_>, Vec<_>) = runs
        .into_iter()
        .partition(|(_, started)| cutoff.is_some_and(|cutoff| *started < cutoff));
    let excess = recent.len().saturating_sub(retention_runs);

    expired
        .into_iter()
        .chain(recent.into_iter().take(excess))
        .map(|(path, _)| path)
        .collect()
}
