// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result, bail};
use log::info;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// What the user asked to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    Pid(u32),
    /// Program followed by its arguments; never empty.
    Command(Vec<String>),
}

/// A command started by us, sharing our stdio.
pub struct SpawnedProcess {
    program: String,
    pid: u32,
    child: Child,
}

impl SpawnedProcess {
    pub fn spawn(command: &[String]) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!("empty command");
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to spawn: {program}"))?;

        let pid = child.id().context("spawned process has no pid")?;
        info!("[{program}] spawned (pid={pid})");
        Ok(Self {
            program: program.clone(),
            pid,
            child,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Wait for the child to exit, reaping it.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self
            .child
            .wait()
            .await
            .with_context(|| format!("[{}] failed to wait", self.program))?;
        info!("[{}] exited with {status}", self.program);
        Ok(status)
    }
}

/// The process a session samples.
pub enum Target {
    Attached(u32),
    Spawned(SpawnedProcess),
}

impl Target {
    pub fn start(spec: &TargetSpec) -> Result<Self> {
        match spec {
            TargetSpec::Pid(pid) => {
                info!("attaching to pid {pid}");
                Ok(Target::Attached(*pid))
            }
            TargetSpec::Command(command) => SpawnedProcess::spawn(command).map(Target::Spawned),
        }
    }

    pub fn pid(&self) -> u32 {
        match self {
            Target::Attached(pid) => *pid,
            Target::Spawned(p) => p.pid(),
        }
    }

    /// Wait for a spawned child to terminate. Attached processes are not
    /// ours to wait on.
    pub async fn finish(self) -> Result<Option<ExitStatus>> {
        match self {
            Target::Attached(_) => Ok(None),
            Target::Spawned(mut p) => {
                info!("Logging stopped, waiting for logged process to terminate.");
                p.wait().await.map(Some)
            }
        }
    }
}
