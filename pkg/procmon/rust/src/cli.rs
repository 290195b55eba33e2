// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::{LoggingConfig, Settings};
use crate::error::ConfigError;
use crate::output::resolve_output_path;
use crate::probe::ProbeKind;
use crate::target::TargetSpec;
use clap::{ArgGroup, Parser};
use log::warn;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Log the memory and CPU consumption of a process.
#[derive(Parser, Debug, Clone)]
#[command(name = "dd-procmon", version)]
#[command(group(ArgGroup::new("action").args(["log", "display"])))]
pub struct Args {
    /// Record samples of a process to a file (default action)
    #[arg(short, long)]
    pub log: bool,

    /// Display a recorded log (not implemented yet)
    #[arg(short, long)]
    pub display: bool,

    /// Id of an already running process to log
    #[arg(short, long)]
    pub pid: Option<u32>,

    /// Seconds between two samples; the first sample is taken one interval
    /// after start [default: sample_rate setting, 1]
    #[arg(short, long, allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Seconds to log for; absent or non-positive logs until the process ends
    #[arg(short = 't', long, allow_negative_numbers = true)]
    pub duration: Option<f64>,

    /// Samples buffered between two writes [default: flush_rate setting, 10]
    #[arg(short, long, allow_negative_numbers = true)]
    pub flush_rate: Option<i64>,

    /// Output file; a single `{}` is replaced by the first free index
    /// [default: output_file setting, procmon_{}.log]
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Also print every row to stdout
    #[arg(short, long)]
    pub verbose: bool,

    /// How samples are taken [default: probe setting, top]
    #[arg(long, value_enum)]
    pub probe: Option<ProbeKind>,

    /// Settings file
    #[arg(short, long, env = "DD_PROCMON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run and log, with its arguments
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Log,
    Display,
}

/// A validated `log` invocation whose target has not been started yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRequest {
    pub target: TargetSpec,
    pub probe: ProbeKind,
    pub sample_interval: Duration,
    pub duration: Option<Duration>,
    pub flush_rate: usize,
    pub output_path: PathBuf,
    pub verbose: bool,
}

impl LogRequest {
    pub fn logging_config(&self, pid: u32) -> LoggingConfig {
        LoggingConfig {
            pid,
            sample_interval: self.sample_interval,
            duration: self.duration,
            flush_rate: self.flush_rate,
            output_path: self.output_path.clone(),
            verbose: self.verbose,
        }
    }
}

impl Args {
    pub fn action(&self) -> Action {
        if self.display {
            Action::Display
        } else {
            Action::Log
        }
    }

    /// Validate the `log` arguments against `settings`. The output path is
    /// resolved last, once everything else is known to be valid.
    pub fn log_request(&self, settings: &Settings) -> Result<LogRequest, ConfigError> {
        let target = match (self.pid, self.command.is_empty()) {
            (Some(_), false) => return Err(ConfigError::ConflictingTarget),
            (Some(pid), true) => TargetSpec::Pid(pid),
            (None, false) => TargetSpec::Command(self.command.clone()),
            (None, true) => return Err(ConfigError::MissingTarget),
        };

        let rate = self.rate.unwrap_or(settings.sample_rate);
        let sample_interval = Duration::try_from_secs_f64(rate)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or(ConfigError::NonPositiveRate(rate))?;
        // The scheduler adds the interval to the current instant for every tick.
        if sample_interval
            .checked_mul(2)
            .and_then(|d| Instant::now().checked_add(d))
            .is_none()
        {
            return Err(ConfigError::RateTooLarge(rate));
        }

        let flush_rate = self.flush_rate.unwrap_or(settings.flush_rate);
        let flush_rate = usize::try_from(flush_rate)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::NonPositiveFlushRate(flush_rate))?;

        let duration = match self.duration {
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs).ok(),
            Some(secs) => {
                warn!("non-positive duration ({secs}), logging until the process ends");
                None
            }
            None => None,
        };

        let template = self.output_file.as_deref().unwrap_or(&settings.output_file);
        let output_path = resolve_output_path(template)?;

        Ok(LogRequest {
            target,
            probe: self.probe.unwrap_or(settings.probe),
            sample_interval,
            duration,
            flush_rate,
            output_path,
            verbose: self.verbose,
        })
    }
}
