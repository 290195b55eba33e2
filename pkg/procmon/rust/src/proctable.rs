// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::procfs::{ProcStat, root_path};
use log::{debug, info, warn};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    /// Exited but not yet reaped by its parent.
    Zombie,
    Gone,
}

/// Liveness queries and forced termination for the monitored pid.
pub trait ProcessTable {
    fn status(&self, pid: u32) -> ProcessStatus;

    /// Forcibly terminate `pid`. Failures are logged, not returned: the
    /// session ends either way.
    fn kill(&self, pid: u32);
}

/// [`ProcessTable`] backed by `/proc` and `kill(2)`.
#[derive(Debug, Clone)]
pub struct ProcfsTable {
    root: PathBuf,
}

impl ProcfsTable {
    pub fn new() -> Self {
        Self::with_root(root_path().to_path_buf())
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Default for ProcfsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for ProcfsTable {
    fn status(&self, pid: u32) -> ProcessStatus {
        match ProcStat::read(&self.root, pid) {
            Ok(stat) => match stat.state {
                'Z' => ProcessStatus::Zombie,
                'X' | 'x' => ProcessStatus::Gone,
                _ => ProcessStatus::Running,
            },
            Err(e) => {
                debug!("[pid={pid}] stat unavailable: {e}");
                ProcessStatus::Gone
            }
        }
    }

    fn kill(&self, pid: u32) {
        let Ok(raw) = i32::try_from(pid) else {
            warn!("[pid={pid}] pid out of range, not sending SIGKILL");
            return;
        };
        info!("[pid={pid}] sending SIGKILL");
        if let Err(e) = signal::kill(Pid::from_raw(raw), Signal::SIGKILL) {
            warn!("[pid={pid}] failed to send SIGKILL: {e}");
        }
    }
}
