// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Sources of per-process resource samples.

mod procfs;
mod top;

pub use self::procfs::ProcfsProbe;
pub use self::top::{SnapshotCommand, TopProbe};

use crate::sample::Sample;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::future::Future;

/// Reads the current resource usage of a process.
///
/// Implementations never fail: anything that prevents a measurement is
/// reported as [`Sample::Invalid`], which ends the session.
pub trait ResourceProbe {
    fn sample(&mut self, pid: u32) -> impl Future<Output = Sample> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Run the external snapshot command (`top`) once per sample.
    #[default]
    Top,
    /// Read `/proc/<pid>/stat` directly.
    Procfs,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::Top => write!(f, "top"),
            ProbeKind::Procfs => write!(f, "procfs"),
        }
    }
}

/// Probe selected at runtime.
pub enum Probe {
    Top(TopProbe),
    Procfs(ProcfsProbe),
}

impl ResourceProbe for Probe {
    async fn sample(&mut self, pid: u32) -> Sample {
        match self {
            Probe::Top(p) => p.sample(pid).await,
            Probe::Procfs(p) => p.sample(pid).await,
        }
    }
}
