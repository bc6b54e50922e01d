//! Append-only event log, newest entry first

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::format_clock;

/// Who caused a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    Player,
    System,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Player => "PLAYER",
            Actor::System => "SYSTEM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Strictly increasing; derived from the session time in ms
    pub id: u64,
    pub actor: Actor,
    pub description: String,
    /// Session time as `HH:MM:SS`
    pub timestamp: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    last_id: Option<u64>,
    capacity: Option<usize>,
}

impl EventLog {
    /// Unbounded unless a capacity is given; the oldest entries are evicted
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            last_id: None,
            capacity,
        }
    }

    /// Prepend an entry stamped at `elapsed_ms`
    pub fn append(&mut self, actor: Actor, description: impl Into<String>, elapsed_ms: u64) -> &LogEntry {
        let id = match self.last_id {
            Some(last) if elapsed_ms <= last => last + 1,
            _ => elapsed_ms,
        };
        self.last_id = Some(id);

        self.entries.push_front(LogEntry {
            id,
            actor,
            description: description.into(),
            timestamp: format_clock(elapsed_ms),
            elapsed_ms,
        });
        if let Some(capacity) = self.capacity {
            self.entries.truncate(capacity);
        }
        &self.entries[0]
    }

    /// Newest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_id = None;
    }
}
