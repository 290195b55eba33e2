// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::buffer::SampleBuffer;
use crate::error::SessionError;
use crate::sample::HEADER;
use log::debug;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Sole writer of a session's output.
pub struct FlushSink<W: Write> {
    out: W,
    verbose: bool,
}

impl FlushSink<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path, verbose: bool) -> Result<Self, SessionError> {
        let file = File::create(path).map_err(|source| SessionError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufWriter::new(file), verbose)
    }
}

impl<W: Write> FlushSink<W> {
    pub fn new(mut out: W, verbose: bool) -> Result<Self, SessionError> {
        writeln!(out, "{HEADER}")?;
        out.flush()?;
        Ok(Self { out, verbose })
    }

    /// Write the occupied slots of `buffer` oldest first, then reset it.
    /// Returns the number of rows written.
    pub fn flush(&mut self, buffer: &mut SampleBuffer) -> Result<usize, SessionError> {
        let rows = buffer.cursor();
        let stdout = self.verbose.then(io::stdout);
        for reading in buffer.occupied() {
            writeln!(self.out, "{reading}")?;
            if let Some(stdout) = &stdout {
                writeln!(stdout.lock(), "{reading}")?;
            }
        }
        self.out.flush()?;
        buffer.clear();
        debug!("flushed {rows} row(s)");
        Ok(rows)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
