//! Bounded log of recent changes shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::models::EntityKind;

/// Number of entries kept when no limit is configured
pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Created => write!(f, "created"),
            Action::Updated => write!(f, "updated"),
            Action::Deleted => write!(f, "deleted"),
        }
    }
}

/// One recorded change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub kind: EntityKind,
    pub action: Action,
    pub name: String,
}

impl ActivityEntry {
    /// Message such as `New project "Mobile App" created` or `Task "Fix" updated`
    pub fn message(&self) -> String {
        match self.action {
            Action::Created => format!("New {} \"{}\" created", self.kind.noun(), self.name),
            _ => format!("{} \"{}\" {}", self.kind, self.name, self.action),
        }
    }
}

/// Newest-first activity entries, capped at a fixed length
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    limit: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_LIMIT)
    }
}

impl ActivityLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(DEFAULT_ACTIVITY_LIMIT)),
            limit,
        }
    }

    pub fn record(&mut self, kind: EntityKind, action: Action, name: &str) {
        self.record_at(Utc::now(), kind, action, name);
    }

    /// Records an entry with an explicit timestamp, dropping the oldest past the limit
    pub fn record_at(&mut self, at: DateTime<Utc>, kind: EntityKind, action: Action, name: &str) {
        if self.limit == 0 {
            return;
        }
        self.entries.push_front(ActivityEntry {
            at,
            kind,
            action,
            name: name.to_string(),
        });
        self.entries.truncate(self.limit);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Human-readable age of `at` relative to `now` ("just now", "2 hours ago")
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    let (amount, unit) = match secs {
        0..=59 => return "just now".to_string(),
        60..=3_599 => (secs / 60, "minute"),
        3_600..=86_399 => (secs / 3_600, "hour"),
        86_400..=2_591_999 => (secs / 86_400, "day"),
        _ => (secs / 2_592_000, "month"),
    };
    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_messages() {
        let mut log = ActivityLog::default();
        log.record(EntityKind::Project, Action::Created, "Mobile App");
        log.record(EntityKind::Task, Action::Updated, "Fix login");
        log.record(EntityKind::User, Action::Deleted, "Mike Johnson");

        let messages: Vec<String> = log.entries().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "User \"Mike Johnson\" deleted",
                "Task \"Fix login\" updated",
                "New project \"Mobile App\" created",
            ]
        );
    }

    #[test]
    fn test_log_is_bounded_newest_first() {
        let mut log = ActivityLog::new(3);
        for i in 0..5 {
            log.record(EntityKind::Task, Action::Created, &format!("T{}", i));
        }
        let names: Vec<&str> = log.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["T4", "T3", "T2"]);
    }

    #[test]
    fn test_zero_limit_keeps_nothing() {
        let mut log = ActivityLog::new(0);
        log.record(EntityKind::Role, Action::Created, "Auditor");
        assert!(log.is_empty());
    }

    #[test]
    fn test_huge_limit_does_not_preallocate() {
        let mut log = ActivityLog::new(usize::MAX);
        for i in 0..30 {
            log.record(EntityKind::Task, Action::Created, &format!("T{}", i));
        }
        assert_eq!(log.len(), 30);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(relative_time(now - Duration::days(1), now), "1 day ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now - Duration::days(65), now), "2 months ago");
        // Clock skew never yields a negative age
        assert_eq!(relative_time(now + Duration::minutes(5), now), "just now");
    }
}
