// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static PROC_ROOT: OnceLock<PathBuf> = OnceLock::new();

pub fn root_path() -> &'static Path {
    PROC_ROOT.get_or_init(|| {
        if let Ok(v) = env::var("HOST_PROC") {
            return v.into();
        }
        "/proc".into()
    })
}

/// The subset of `/proc/<pid>/stat` we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcStat {
    pub state: char,
    /// User + system CPU time in clock ticks.
    pub cpu_ticks: u64,
    /// Process start time in clock ticks since boot.
    pub start_ticks: u64,
    /// Virtual memory size in bytes.
    pub vsize: u64,
    /// Resident set size in pages.
    pub rss_pages: u64,
}

// Offsets into the fields following the `(comm)` entry.
const STATE: usize = 0;
const UTIME: usize = 11;
const STIME: usize = 12;
const STARTTIME: usize = 19;
const VSIZE: usize = 20;
const RSS: usize = 21;

impl ProcStat {
    /// Parse the contents of a stat file. The command name may contain spaces
    /// and parentheses, so fields are counted from the last `)`.
    pub fn parse(content: &str) -> Option<Self> {
        let (_, rest) = content.rsplit_once(')')?;
        let fields: Vec<&str> = rest.split_whitespace().collect();
        let field = |i: usize| fields.get(i).and_then(|f| f.parse::<u64>().ok());

        Some(Self {
            state: fields.get(STATE)?.chars().next()?,
            cpu_ticks: field(UTIME)? + field(STIME)?,
            start_ticks: field(STARTTIME)?,
            vsize: field(VSIZE)?,
            // rss is signed in the kernel ABI; a negative value means nothing
            // is resident.
            rss_pages: fields
                .get(RSS)?
                .parse::<i64>()
                .ok()?
                .max(0)
                .unsigned_abs(),
        })
    }

    pub fn read(root: &Path, pid: u32) -> io::Result<Self> {
        let path = root.join(pid.to_string()).join("stat");
        let content = fs::read_to_string(&path)?;
        Self::parse(&content).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed {}", path.display()),
            )
        })
    }
}

/// Seconds since boot, from `/proc/uptime`.
pub fn read_uptime(root: &Path) -> io::Result<f64> {
    let content = fs::read_to_string(root.join("uptime"))?;
    content
        .split_whitespace()
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed uptime"))
}
