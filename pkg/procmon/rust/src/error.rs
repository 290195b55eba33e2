// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid user input. Always reported before any sampling starts.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing process id to log (--pid/-p <pid>) or command to run and log (<command>)")]
    MissingTarget,
    #[error("got a process id and a command, only one is allowed")]
    ConflictingTarget,
    #[error("sampling rate must be positive (got {0})")]
    NonPositiveRate(f64),
    #[error("sampling rate is too large (got {0})")]
    RateTooLarge(f64),
    #[error("flush rate must be positive (got {0})")]
    NonPositiveFlushRate(i64),
    #[error("output file {template:?} has {count} `{{}}` placeholders, at most one is allowed")]
    TooManyPlaceholders { template: String, count: usize },
}

/// Fatal failure while a session is recording.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to open output file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to write output file: {0}")]
    Io(#[from] io::Error),
}
