//! In-session telemetry records.
//!
//! None of these are persisted; they live as long as the telemetry container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use uuid::Uuid;

/// Maximum number of entries kept in an [`ActivityLog`].
pub const ACTIVITY_LOG_CAPACITY: usize = 20;

/// A single line in the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl ActivityEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            text: text.into(),
        }
    }
}

/// Most-recent-first feed, bounded to [`ACTIVITY_LOG_CAPACITY`] entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `entry`, dropping the oldest entries beyond capacity.
    pub fn record(&mut self, entry: ActivityEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(ACTIVITY_LOG_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Last-known resource figures shown next to the session stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceSnapshot {
    /// Percent
    pub memory: u32,
    /// Percent
    pub cpu: u32,
    pub network: String,
}

impl Default for PerformanceSnapshot {
    fn default() -> Self {
        Self {
            memory: 45,
            cpu: 23,
            network: "Connected".to_string(),
        }
    }
}

/// Partial update for [`PerformanceSnapshot`]; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceSample {
    pub memory: Option<u32>,
    pub cpu: Option<u32>,
    pub network: Option<String>,
}

impl PerformanceSnapshot {
    pub fn apply(&mut self, sample: PerformanceSample) {
        if let Some(memory) = sample.memory {
            self.memory = memory;
        }
        if let Some(cpu) = sample.cpu {
            self.cpu = cpu;
        }
        if let Some(network) = sample.network {
            self.network = network;
        }
    }
}

/// Session figures exposed to the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStats {
    /// Local wall-clock time the session started, empty when none is active
    pub login_time: String,
    /// `H:MM:SS`
    pub duration: String,
    pub call_count: u64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            login_time: String::new(),
            duration: format_duration(Duration::ZERO),
            call_count: 0,
        }
    }
}

/// Formats a duration as `H:MM:SS` (hours unpadded).
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
