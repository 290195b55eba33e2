// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::sample::{Reading, Sample};
use crate::units::UnitScales;
use log::debug;
use serde::Deserialize;
use time::OffsetDateTime;

/// Zero-based column positions of the fields we read from a snapshot row.
///
/// Defaults match `top -b`'s standard layout:
/// `PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ColumnLayout {
    pub memory: usize,
    pub virtual_memory: usize,
    pub cpu: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            memory: 5,
            virtual_memory: 4,
            cpu: 8,
        }
    }
}

/// Turns the textual output of a one-shot snapshot command into a [`Sample`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotParser {
    columns: ColumnLayout,
    scales: UnitScales,
}

impl SnapshotParser {
    pub fn new(columns: ColumnLayout, scales: UnitScales) -> Self {
        Self { columns, scales }
    }

    /// Parse the data row (the last non-empty line) of `output`.
    ///
    /// Any malformed input yields [`Sample::Invalid`]: the target has most
    /// likely exited between the liveness check and the snapshot.
    pub fn parse(&self, output: &str, timestamp: OffsetDateTime) -> Sample {
        match self.parse_row(output, timestamp) {
            Some(reading) => Sample::Valid(reading),
            None => {
                debug!("unparseable snapshot row: {:?}", output.lines().last());
                Sample::Invalid
            }
        }
    }

    fn parse_row(&self, output: &str, timestamp: OffsetDateTime) -> Option<Reading> {
        let row = output.lines().rev().find(|l| !l.trim().is_empty())?;
        let fields: Vec<&str> = row.split_whitespace().collect();

        let memory = self.scales.normalize(fields.get(self.columns.memory)?).ok()?;
        let virtual_memory = self
            .scales
            .normalize(fields.get(self.columns.virtual_memory)?)
            .ok()?;
        let cpu_percent: f64 = fields
            .get(self.columns.cpu)?
            .replace(',', ".")
            .parse()
            .ok()?;
        if !cpu_percent.is_finite() {
            return None;
        }

        Some(Reading {
            memory,
            virtual_memory,
            cpu_percent,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const TS: OffsetDateTime = datetime!(2026-03-01 12:00:00 UTC);

    const TOP_OUTPUT: &str = "\
top - 12:00:00 up 3 days,  2:01,  1 user,  load average: 0.10, 0.20, 0.30
Tasks:   1 total,   0 running,   1 sleeping,   0 stopped,   0 zombie
%Cpu(s):  1.2 us,  0.4 sy,  0.0 ni, 98.2 id,  0.0 wa,  0.0 hi,  0.2 si,  0.0 st
MiB Mem :  15896.4 total,   8123.0 free,   4210.7 used,   3562.7 buff/cache
MiB Swap:   2048.0 total,   2048.0 free,      0.0 used.  11258.3 avail Mem

    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND
   4242 agent     20   0 1234567  45678   9876 S   7.3   0.3   0:01.23 sleep
";

    #[test]
    fn test_parse_top_row() {
        let sample = SnapshotParser::default().parse(TOP_OUTPUT, TS);
        assert_eq!(
            sample,
            Sample::Valid(Reading {
                memory: 45678,
                virtual_memory: 1_234_567,
                cpu_percent: 7.3,
                timestamp: TS,
            })
        );
    }

    #[test]
    fn test_parse_suffixed_memory() {
        let output = "PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND\n\
                      1 root 20 0 2.5g 1.5m 0 R 100,0 1.0 1:00.00 burn\n";
        let Sample::Valid(r) = SnapshotParser::default().parse(output, TS) else {
            panic!("expected a valid sample");
        };
        assert_eq!(r.memory, 1536);
        assert_eq!(r.virtual_memory, 2_621_440);
        assert_eq!(r.cpu_percent, 100.0);
    }

    #[test]
    fn test_header_only_is_invalid() {
        // top prints only the header once the pid is gone.
        let output = "    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND\n";
        assert_eq!(SnapshotParser::default().parse(output, TS), Sample::Invalid);
    }

    #[test]
    fn test_empty_output_is_invalid() {
        assert_eq!(SnapshotParser::default().parse("", TS), Sample::Invalid);
        assert_eq!(SnapshotParser::default().parse("\n\n", TS), Sample::Invalid);
    }

    #[test]
    fn test_truncated_row_is_invalid() {
        let output = "header\n1 root 20 0 100 200\n";
        assert_eq!(SnapshotParser::default().parse(output, TS), Sample::Invalid);
    }

    #[test]
    fn test_non_numeric_cpu_is_invalid() {
        let output = "header\n1 root 20 0 100 200 0 S n/a 0.0 0:00.00 x\n";
        assert_eq!(SnapshotParser::default().parse(output, TS), Sample::Invalid);
    }

    #[test]
    fn test_custom_layout() {
        let parser = SnapshotParser::new(
            ColumnLayout {
                memory: 0,
                virtual_memory: 1,
                cpu: 2,
            },
            UnitScales::default(),
        );
        let Sample::Valid(r) = parser.parse("10 20 0.5", TS) else {
            panic!("expected a valid sample");
        };
        assert_eq!((r.memory, r.virtual_memory, r.cpu_percent), (10, 20, 0.5));
    }
}
