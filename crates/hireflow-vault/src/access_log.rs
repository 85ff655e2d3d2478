// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capped, append-only access history for credential reads.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Once the log grows past this many entries it is trimmed.
pub const MAX_ENTRIES: usize = 1000;

/// Number of most recent entries kept after a trim.
pub const TRIM_TO: usize = 500;

/// One successful credential read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessLogEntry {
    pub service: String,
    pub timestamp: DateTime<Utc>,
    /// Where the read came from (caller address, agent id, or "unknown").
    pub origin: String,
}

/// Aggregated usage for a single service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    pub service: String,
    pub total_requests: usize,
    /// Reads within the trailing one-hour window.
    pub recent_requests: usize,
}

/// Append-only access log bounded by [`MAX_ENTRIES`].
#[derive(Debug, Default)]
pub struct AccessLog {
    entries: Vec<AccessLogEntry>,
}

impl AccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, trimming to the most recent [`TRIM_TO`] entries when
    /// the log exceeds [`MAX_ENTRIES`].
    pub fn push(&mut self, entry: AccessLogEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - TRIM_TO;
            self.entries.drain(..excess);
        }
    }

    /// Count total and last-hour reads for `service` as of `now`.
    pub fn usage(&self, service: &str, now: DateTime<Utc>) -> UsageReport {
        let window_start = now - Duration::hours(1);
        let mut total_requests = 0;
        let mut recent_requests = 0;
        for entry in self.entries.iter().filter(|e| e.service == service) {
            total_requests += 1;
            if entry.timestamp > window_start {
                recent_requests += 1;
            }
        }
        UsageReport {
            service: service.to_string(),
            total_requests,
            recent_requests,
        }
    }

    pub fn entries(&self) -> &[AccessLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
