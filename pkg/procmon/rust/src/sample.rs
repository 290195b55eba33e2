// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Column header written as the first line of every output file.
pub const HEADER: &str = "Time, RES, VIRT, CPU";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]"
);

/// One successful measurement. Memory values are in KiB.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub memory: u64,
    pub virtual_memory: u64,
    pub cpu_percent: f64,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Valid(Reading),
    /// The target could not be observed; carries no data.
    Invalid,
}

impl Sample {
    pub fn is_valid(&self) -> bool {
        matches!(self, Sample::Valid(_))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timestamp = self
            .timestamp
            .format(TIMESTAMP_FORMAT)
            .map_err(|_| fmt::Error)?;
        write!(
            f,
            "{timestamp}, {}, {}, {:.1}",
            self.memory, self.virtual_memory, self.cpu_percent
        )
    }
}

/// Wall-clock source for sample timestamps, pinned to the offset resolved
/// at startup.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: UtcOffset,
}

impl Clock {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Resolve the local offset, falling back to UTC when it cannot be
    /// determined (e.g. once other threads exist).
    pub fn local() -> Self {
        Self::new(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}
