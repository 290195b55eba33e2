// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::sample::Reading;

/// Fixed-capacity batch of readings waiting to be written.
///
/// The cursor is the number of occupied slots; it never exceeds the capacity.
#[derive(Debug)]
pub struct SampleBuffer {
    slots: Vec<Reading>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Store `reading` in the next free slot. Returns true when the buffer is
    /// now full and must be flushed before the next push.
    pub fn push(&mut self, reading: Reading) -> bool {
        debug_assert!(!self.is_full(), "push into a full buffer");
        self.slots.push(reading);
        self.is_full()
    }

    pub fn cursor(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slots, oldest first.
    pub fn occupied(&self) -> &[Reading] {
        &self.slots
    }

    /// Reset the cursor to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
