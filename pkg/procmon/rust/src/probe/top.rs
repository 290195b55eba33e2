// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::ResourceProbe;
use crate::parser::SnapshotParser;
use crate::sample::{Clock, Sample};
use log::warn;
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

const PID_PLACEHOLDER: &str = "{pid}";

/// The one-shot snapshot command. `{pid}` in any argument is replaced by the
/// target pid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for SnapshotCommand {
    fn default() -> Self {
        Self {
            program: "top".to_string(),
            args: vec!["-b".into(), "-n1".into(), format!("-p{PID_PLACEHOLDER}")],
        }
    }
}

impl SnapshotCommand {
    pub fn args_for(&self, pid: u32) -> Vec<String> {
        let pid = pid.to_string();
        self.args
            .iter()
            .map(|a| a.replace(PID_PLACEHOLDER, &pid))
            .collect()
    }
}

/// Samples a process by running [`SnapshotCommand`] and parsing its last
/// output line.
pub struct TopProbe {
    command: SnapshotCommand,
    parser: SnapshotParser,
    clock: Clock,
}

impl TopProbe {
    pub fn new(command: SnapshotCommand, parser: SnapshotParser, clock: Clock) -> Self {
        Self {
            command,
            parser,
            clock,
        }
    }
}

impl ResourceProbe for TopProbe {
    async fn sample(&mut self, pid: u32) -> Sample {
        let output = Command::new(&self.command.program)
            .args(self.command.args_for(pid))
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                self.parser.parse(&stdout, self.clock.now())
            }
            Err(e) => {
                warn!("[pid={pid}] failed to run {}: {e}", self.command.program);
                Sample::Invalid
            }
        }
    }
}
