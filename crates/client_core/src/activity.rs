use chrono::{DateTime, Utc};
use shared::domain::{ActivityAction, ActivityId, ActivityRecord, Event};

pub const MAX_ACTIVITY_RECORDS: usize = 20;

/// Newest-first log of save/remove decisions, capped at
/// `MAX_ACTIVITY_RECORDS`. Older records fall off silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    records: Vec<ActivityRecord>,
    last_id: i64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a persisted log. Input is expected newest first and is
    /// truncated to the cap.
    pub fn from_records(mut records: Vec<ActivityRecord>) -> Self {
        records.truncate(MAX_ACTIVITY_RECORDS);
        let last_id = records.iter().map(|record| record.id.0).max().unwrap_or(0);
        Self { records, last_id }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepends a snapshot of `event`. Ids derive from the timestamp in
    /// milliseconds and are bumped when two records land in the same
    /// millisecond, so they stay unique and increasing. A restored id at
    /// `i64::MAX` saturates instead of overflowing.
    pub fn record(
        &mut self,
        action: ActivityAction,
        event: &Event,
        at: DateTime<Utc>,
    ) -> ActivityRecord {
        let id = at.timestamp_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;

        let record = ActivityRecord {
            id: ActivityId(id),
            action,
            event_id: event.id,
            event_title: event.title.clone(),
            tags: event.tags.clone(),
            timestamp: at,
        };
        self.records.insert(0, record.clone());
        self.records.truncate(MAX_ACTIVITY_RECORDS);
        record
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
