// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The target is no longer in the process table.
    ProcessExited,
    /// The target exited but was never reaped; it was killed.
    ZombieDetected,
    /// The probe could not read the target.
    InvalidSample,
    /// The configured duration ran out.
    DurationElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Sampling on schedule.
    Running,
    /// Buffer full, rows being written.
    FlushPending,
    /// Sampling stopped; only the final flush remains.
    Terminated(TerminationReason),
}

impl SessionState {
    pub fn is_terminated(self) -> bool {
        matches!(self, SessionState::Terminated(_))
    }

    pub(crate) fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Running, FlushPending) | (FlushPending, Running) | (Running, Terminated(_))
        )
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::ProcessExited => write!(f, "process exited"),
            TerminationReason::ZombieDetected => write!(f, "zombie detected"),
            TerminationReason::InvalidSample => write!(f, "invalid sample"),
            TerminationReason::DurationElapsed => write!(f, "duration elapsed"),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Running => write!(f, "running"),
            SessionState::FlushPending => write!(f, "flush pending"),
            SessionState::Terminated(reason) => write!(f, "terminated ({reason})"),
        }
    }
}
