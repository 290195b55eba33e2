// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub const HEADER: &str = "Time, RES, VIRT, CPU";

/// Handle to a running dd-procmon process.
pub struct MonitorHandle {
    child: Child,
    lines: Arc<Mutex<Vec<String>>>,
    readers: Vec<std::thread::JoinHandle<()>>,
}

impl MonitorHandle {
    /// Run dd-procmon in `workdir` with the settings file `settings` and `args`.
    pub fn start(workdir: &Path, settings: &Path, args: &[&str]) -> Self {
        let bin = env!("CARGO_BIN_EXE_dd-procmon");
        let mut child = Command::new(bin)
            .current_dir(workdir)
            .env_remove("DD_PROCMON_CONFIG")
            .env("DD_PROCMON_LOG_LEVEL", "debug")
            .arg("--config")
            .arg(settings)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start dd-procmon");

        let stdout = child.stdout.take().expect("failed to capture stdout");
        let stderr = child.stderr.take().expect("failed to capture stderr");
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let readers = vec![
            collect_lines("procmon", stdout, Arc::clone(&lines)),
            collect_lines("procmon:err", stderr, Arc::clone(&lines)),
        ];

        Self {
            child,
            lines,
            readers,
        }
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Wait until an output line containing `pattern` appears, or timeout.
    pub fn wait_for_line(&self, pattern: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.count_matches(pattern) > 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    pub fn count_matches(&self, pattern: &str) -> usize {
        let lines = self.lines.lock().unwrap();
        lines.iter().filter(|l| l.contains(pattern)).count()
    }

    /// Wait for dd-procmon to exit within the given timeout, killing it if it
    /// does not. All of its output has been collected once this returns.
    pub fn wait_with_timeout(&mut self, timeout: Duration) -> ExitStatus {
        let deadline = Instant::now() + timeout;
        let status = loop {
            match self.child.try_wait().expect("failed to check dd-procmon status") {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    self.child.kill().ok();
                    break self.child.wait().expect("failed to wait on killed dd-procmon");
                }
                None => std::thread::sleep(Duration::from_millis(50)),
            }
        };
        for reader in self.readers.drain(..) {
            reader.join().ok();
        }
        status
    }

    pub fn wait(&mut self) -> ExitStatus {
        self.wait_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Extract the pid from the "spawned (pid=NNN)" line.
    pub fn spawned_pid(&self) -> Option<u32> {
        let lines = self.lines.lock().unwrap();
        lines.iter().find_map(|l| {
            let marker = "spawned (pid=";
            let start = l.find(marker)? + marker.len();
            let digits: String = l[start..].chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn collect_lines(
    tag: &'static str,
    stream: impl Read + Send + 'static,
    lines: Arc<Mutex<Vec<String>>>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            match line {
                Ok(l) => {
                    eprintln!("[{tag}] {l}");
                    lines.lock().unwrap().push(l);
                }
                Err(_) => break,
            }
        }
    })
}

/// Write a settings file into `dir` and return its path.
pub fn write_settings(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("procmon.yaml");
    std::fs::write(&path, yaml)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    path
}

/// Settings sampling through /proc so no external tool is needed.
pub fn procfs_settings(dir: &Path) -> PathBuf {
    write_settings(dir, "probe: procfs\n")
}

/// Data rows of an output file, header checked and stripped.
pub fn read_rows(path: &Path) -> Vec<String> {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(HEADER), "missing header in {}", path.display());
    lines.map(str::to_string).collect()
}

/// Split a data row into its four fields, checking their shape.
pub fn parse_row(row: &str) -> (String, u64, u64, f64) {
    let fields: Vec<&str> = row.split(", ").collect();
    assert_eq!(fields.len(), 4, "malformed row: {row}");
    let timestamp = fields[0];
    assert_eq!(timestamp.len(), "2026-01-01 00:00:00.000000".len(), "bad timestamp: {row}");
    assert_eq!(&timestamp[10..11], " ", "bad timestamp: {row}");
    assert_eq!(&timestamp[19..20], ".", "bad timestamp: {row}");
    let cpu = fields[3];
    assert_eq!(
        cpu.split_once('.').map(|(_, frac)| frac.len()),
        Some(1),
        "cpu should have one decimal: {row}"
    );
    (
        timestamp.to_string(),
        fields[1].parse().expect("memory is an integer"),
        fields[2].parse().expect("virtual memory is an integer"),
        cpu.parse().expect("cpu is a float"),
    )
}

/// Start a long-running process for attach tests.
pub fn start_sleeper(secs: u32) -> Child {
    Command::new("/bin/sleep")
        .arg(secs.to_string())
        .spawn()
        .expect("failed to start sleeper")
}
