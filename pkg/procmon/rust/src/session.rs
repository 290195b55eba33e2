// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::buffer::SampleBuffer;
use crate::config::LoggingConfig;
use crate::error::SessionError;
use crate::probe::ResourceProbe;
use crate::proctable::{ProcessStatus, ProcessTable};
use crate::sample::Sample;
use crate::sink::FlushSink;
use crate::state::{SessionState, TerminationReason};
use log::{debug, info, warn};
use std::io::Write;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub reason: TerminationReason,
    pub rows_written: usize,
}

/// One logging run against a single pid.
///
/// Ticks fire every `sample_interval` starting one interval after [`run`]
/// is called, so nothing is recorded during the first interval and a target
/// that lives less than one interval leaves a header-only file. A late tick
/// fires as soon as possible and the schedule restarts from there; missed
/// ticks are never replayed.
///
/// A duration too large to be represented as a deadline runs unbounded.
/// `sample_interval` must fit in an [`Instant`] offset; the CLI rejects
/// rates that do not.
///
/// [`run`]: Session::run
pub struct Session<P, T, W: Write> {
    pid: u32,
    sample_interval: Duration,
    duration: Option<Duration>,
    probe: P,
    table: T,
    sink: FlushSink<W>,
    buffer: SampleBuffer,
    state: SessionState,
    rows_written: usize,
}

impl<P: ResourceProbe, T: ProcessTable, W: Write> Session<P, T, W> {
    pub fn new(config: &LoggingConfig, probe: P, table: T, sink: FlushSink<W>) -> Self {
        Self {
            pid: config.pid,
            sample_interval: config.sample_interval,
            duration: config.duration,
            probe,
            table,
            sink,
            buffer: SampleBuffer::new(config.flush_rate),
            state: SessionState::Running,
            rows_written: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn run(&mut self) -> Result<SessionReport, SessionError> {
        let start = Instant::now();
        let deadline = self.duration.and_then(|d| start.checked_add(d));
        if self.duration.is_some() && deadline.is_none() {
            warn!("[pid={}] duration out of range, logging until the process ends", self.pid);
        }
        let mut ticks = interval_at(start + self.sample_interval, self.sample_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let reason = loop {
            ticks.tick().await;

            if let Some(reason) = self.check_target(deadline) {
                break reason;
            }

            match self.probe.sample(self.pid).await {
                Sample::Valid(reading) => {
                    if self.buffer.push(reading) {
                        self.transition(SessionState::FlushPending);
                        self.flush()?;
                        self.transition(SessionState::Running);
                    }
                }
                Sample::Invalid => break TerminationReason::InvalidSample,
            }
        };

        self.transition(SessionState::Terminated(reason));
        self.flush()?;
        info!(
            "[pid={}] logging stopped: {reason}, {} row(s) written",
            self.pid, self.rows_written
        );
        Ok(SessionReport {
            reason,
            rows_written: self.rows_written,
        })
    }

    pub fn into_sink(self) -> FlushSink<W> {
        self.sink
    }

    fn check_target(&self, deadline: Option<Instant>) -> Option<TerminationReason> {
        let status = self.table.status(self.pid);
        if status == ProcessStatus::Gone {
            return Some(TerminationReason::ProcessExited);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(TerminationReason::DurationElapsed);
        }
        if status == ProcessStatus::Zombie {
            warn!("[pid={}] process is a zombie, killing it", self.pid);
            self.table.kill(self.pid);
            return Some(TerminationReason::ZombieDetected);
        }
        None
    }

    fn flush(&mut self) -> Result<(), SessionError> {
        self.rows_written += self.sink.flush(&mut self.buffer)?;
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {next}",
            self.state
        );
        debug!("[pid={}] {} -> {next}", self.pid, self.state);
        self.state = next;
    }
}
