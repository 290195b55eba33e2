// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::ResourceProbe;
use crate::procfs::{ProcStat, read_uptime, root_path};
use crate::sample::{Clock, Reading, Sample};
use log::debug;
use nix::unistd::{SysconfVar, sysconf};
use std::path::{Path, PathBuf};
use tokio::time::Instant;

const FALLBACK_CLK_TCK: u64 = 100;
const FALLBACK_PAGE_SIZE: u64 = 4096;

#[derive(Debug, Clone, Copy)]
struct CpuMark {
    pid: u32,
    ticks: u64,
    at: Instant,
}

/// Samples a process from `/proc/<pid>/stat` without spawning anything.
///
/// CPU usage is the share of one core used since the previous sample; the
/// first sample of a pid reports the average over the process lifetime.
pub struct ProcfsProbe {
    root: PathBuf,
    clock: Clock,
    clk_tck: u64,
    page_size: u64,
    last: Option<CpuMark>,
}

impl ProcfsProbe {
    pub fn new(clock: Clock) -> Self {
        Self::with_root(
            root_path().to_path_buf(),
            clock,
            sysconf_or(SysconfVar::CLK_TCK, FALLBACK_CLK_TCK),
            sysconf_or(SysconfVar::PAGE_SIZE, FALLBACK_PAGE_SIZE),
        )
    }

    pub fn with_root(root: PathBuf, clock: Clock, clk_tck: u64, page_size: u64) -> Self {
        Self {
            root,
            clock,
            clk_tck: clk_tck.max(1),
            page_size,
            last: None,
        }
    }

    fn cpu_percent(&self, pid: u32, stat: &ProcStat, now: Instant) -> f64 {
        let clk_tck = self.clk_tck as f64;
        if let Some(mark) = self.last
            && mark.pid == pid
            && now > mark.at
        {
            let used = stat.cpu_ticks.saturating_sub(mark.ticks) as f64 / clk_tck;
            return used / (now - mark.at).as_secs_f64() * 100.0;
        }
        lifetime_cpu_percent(&self.root, stat, clk_tck)
    }
}

fn lifetime_cpu_percent(root: &Path, stat: &ProcStat, clk_tck: f64) -> f64 {
    let uptime = match read_uptime(root) {
        Ok(uptime) => uptime,
        Err(e) => {
            debug!("uptime unavailable: {e}");
            return 0.0;
        }
    };
    let age = uptime - stat.start_ticks as f64 / clk_tck;
    if age <= 0.0 {
        return 0.0;
    }
    stat.cpu_ticks as f64 / clk_tck / age * 100.0
}

fn sysconf_or(var: SysconfVar, fallback: u64) -> u64 {
    match sysconf(var) {
        Ok(Some(v)) => u64::try_from(v)
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(fallback),
        _ => fallback,
    }
}

impl ResourceProbe for ProcfsProbe {
    async fn sample(&mut self, pid: u32) -> Sample {
        let stat = match ProcStat::read(&self.root, pid) {
            Ok(stat) => stat,
            Err(e) => {
                debug!("[pid={pid}] stat unavailable: {e}");
                return Sample::Invalid;
            }
        };

        let now = Instant::now();
        let cpu_percent = self.cpu_percent(pid, &stat, now);
        self.last = Some(CpuMark {
            pid,
            ticks: stat.cpu_ticks,
            at: now,
        });

        Sample::Valid(Reading {
            memory: stat.rss_pages * self.page_size / 1024,
            virtual_memory: stat.vsize / 1024,
            cpu_percent,
            timestamp: self.clock.now(),
        })
    }
}
