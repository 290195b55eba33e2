// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::string_slice)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

//! Periodic memory and CPU logging for a single process.

/// Fixed-capacity batch of readings between flushes.
pub mod buffer;
/// Command-line arguments and their validation.
pub mod cli;
/// Settings file and per-session configuration.
pub mod config;
pub mod error;
/// Output file name selection.
pub mod output;
/// Parsing of snapshot command output.
pub mod parser;
pub mod probe;
mod procfs;
/// Liveness and termination of the monitored process.
pub mod proctable;
pub mod sample;
/// The sampling loop.
pub mod session;
pub mod sink;
pub mod state;
/// Attaching to or spawning the monitored process.
pub mod target;
/// Memory size strings with unit suffixes.
pub mod units;
