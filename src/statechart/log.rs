//! Transition log.
//!
//! Tracks the transitions an interpreter performed. [`TransitionLog::record`]
//! returns a new value like the rest of the pure core; a running interpreter
//! appends in place with [`TransitionLog::push`] and may keep only the most
//! recent records.

use super::address::StateAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single transition between leaf states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Active leaf before the transition
    pub from: StateAddress,
    /// Active leaf after the transition
    pub to: StateAddress,
    /// Name of the event that caused it
    pub event: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of transitions, oldest first.
///
/// A bounded log drops its oldest record once it holds `capacity` records.
///
/// # Example
///
/// ```rust
/// use mindset_router::statechart::{StateAddress, TransitionLog, TransitionRecord};
/// use chrono::Utc;
///
/// let log = TransitionLog::new();
/// let log = log.record(TransitionRecord {
///     from: StateAddress::parse("home"),
///     to: StateAddress::parse("about"),
///     event: "GoAbout".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// let path = log.path();
/// assert_eq!(path.len(), 2); // home -> about
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionLog {
    records: VecDeque<TransitionRecord>,
    #[serde(default)]
    capacity: Option<usize>,
}

impl TransitionLog {
    /// An unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A log keeping at most `capacity` records. A zero capacity keeps none.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity: Some(capacity),
        }
    }

    /// Append a record, returning a new log. The receiver is unchanged.
    pub fn record(&self, record: TransitionRecord) -> Self {
        let mut next = self.clone();
        next.push(record);
        next
    }

    /// Append a record in place, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, record: TransitionRecord) {
        self.records.push_back(record);
        if let Some(capacity) = self.capacity {
            while self.records.len() > capacity {
                self.records.pop_front();
            }
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Leaf states visited: the first `from`, then every `to`.
    pub fn path(&self) -> Vec<&StateAddress> {
        let mut path = Vec::new();
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &str, to: &str, event: &str) -> TransitionRecord {
        TransitionRecord {
            from: StateAddress::parse(from),
            to: StateAddress::parse(to),
            event: event.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_log_is_empty() {
        let log = TransitionLog::new();
        assert!(log.is_empty());
        assert!(log.path().is_empty());
        assert!(log.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let log = TransitionLog::new();
        let next = log.record(record("home", "about", "GoAbout"));

        assert_eq!(log.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn path_returns_leaf_sequence() {
        let log = TransitionLog::new()
            .record(record("home", "about", "GoAbout"))
            .record(record("about", "substate.a", "route-changed"));

        let path = log.path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &StateAddress::parse("home"));
        assert_eq!(path[2], &StateAddress::parse("substate.a"));
    }

    #[test]
    fn push_appends_in_place() {
        let mut log = TransitionLog::new();
        log.push(record("home", "about", "GoAbout"));
        log.push(record("about", "home", "GoHome"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.capacity(), None);
        assert_eq!(log.records().last().map(|r| r.event.as_str()), Some("GoHome"));
    }

    #[test]
    fn bounded_log_keeps_most_recent_records() {
        let mut log = TransitionLog::bounded(3);
        for i in 0..10 {
            log.push(record(&format!("s{i}"), &format!("s{}", i + 1), "Next"));
        }

        assert_eq!(log.len(), 3);
        let path = log.path();
        assert_eq!(path[0], &StateAddress::parse("s7"));
        assert_eq!(path[3], &StateAddress::parse("s10"));

        let next = log.record(record("s10", "s11", "Next"));
        assert_eq!(next.len(), 3);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = TransitionLog::bounded(0);
        log.push(record("home", "about", "GoAbout"));
        assert!(log.is_empty());
    }

    #[test]
    fn single_record_has_zero_duration() {
        let log = TransitionLog::new().record(record("home", "about", "GoAbout"));
        assert_eq!(log.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn log_serializes_correctly() {
        let log = TransitionLog::new().record(record("home", "about", "GoAbout"));

        let json = serde_json::to_string(&log).unwrap();
        let back: TransitionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
