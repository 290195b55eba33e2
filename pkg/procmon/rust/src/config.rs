// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::parser::ColumnLayout;
use crate::probe::{ProbeKind, SnapshotCommand};
use crate::units::UnitScales;
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/procmon.yaml";
const LOG_LEVEL_ENV: &str = "DD_PROCMON_LOG_LEVEL";

fn default_sample_rate() -> f64 {
    1.0
}

fn default_flush_rate() -> i64 {
    10
}

fn default_output_file() -> String {
    "procmon_{}.log".to_string()
}

/// Defaults for every session, read once at startup. Command-line flags
/// take precedence over these values.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "default_flush_rate")]
    pub flush_rate: i64,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub probe: ProbeKind,
    #[serde(default)]
    pub snapshot: SnapshotCommand,
    #[serde(default)]
    pub columns: ColumnLayout,
    #[serde(default)]
    pub unit_scales: UnitScales,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            flush_rate: default_flush_rate(),
            output_file: default_output_file(),
            probe: ProbeKind::default(),
            snapshot: SnapshotCommand::default(),
            columns: ColumnLayout::default(),
            unit_scales: UnitScales::default(),
        }
    }
}

/// Everything one session needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub pid: u32,
    pub sample_interval: Duration,
    /// `None` runs until the target goes away.
    pub duration: Option<Duration>,
    pub flush_rate: usize,
    pub output_path: PathBuf,
    pub verbose: bool,
}

/// Load settings from `explicit` if given. Otherwise read
/// [`DEFAULT_CONFIG_PATH`] when it exists and fall back to built-in defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return parse_settings(path);
    }
    let path = Path::new(DEFAULT_CONFIG_PATH);
    if path.exists() {
        parse_settings(path)
    } else {
        debug!("{DEFAULT_CONFIG_PATH} not found, using built-in defaults");
        Ok(Settings::default())
    }
}

fn parse_log_level(level: &str) -> log::Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" | "warning" => log::Level::Warn,
        "error" | "critical" | "off" => log::Level::Error,
        _ => log::Level::Info,
    }
}

/// Log level from `DD_PROCMON_LOG_LEVEL`, Info when unset.
pub fn log_level() -> log::Level {
    std::env::var(LOG_LEVEL_ENV)
        .map(|level| parse_log_level(&level))
        .unwrap_or(log::Level::Info)
}

fn parse_settings(path: &Path) -> Result<Settings> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    // An empty document means "all defaults".
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    debug!("loaded settings from {}", path.display());
    Ok(settings)
}
