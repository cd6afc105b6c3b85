//! Shortlist plus activity log, persisted per user.
//!
//! The in-memory state is authoritative for the session. Store failures are
//! logged and swallowed; a mutation never rolls back because a write failed.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use serde::de::DeserializeOwned;
use shared::domain::{ActivityAction, ActivityRecord, Event, EventId, UserId};
use storage::{keys, load_json, save_json, KeyValueStore, StoreError};
use tracing::{debug, warn};

use crate::{activity::ActivityLog, shortlist::Shortlist};

pub struct ShortlistAggregator {
    store: Arc<dyn KeyValueStore>,
    owner: Option<UserId>,
    shortlist: Shortlist,
    activity: ActivityLog,
}

impl ShortlistAggregator {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            owner: None,
            shortlist: Shortlist::new(),
            activity: ActivityLog::new(),
        }
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn shortlist(&self) -> &Shortlist {
        &self.shortlist
    }

    pub fn entries(&self) -> &[Event] {
        self.shortlist.entries()
    }

    pub fn activity(&self) -> &[ActivityRecord] {
        self.activity.records()
    }

    pub fn unique_tags(&self) -> Vec<String> {
        self.shortlist.unique_tags()
    }

    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        self.shortlist.tag_counts()
    }

    pub fn events_by_tag(&self) -> BTreeMap<String, Vec<&Event>> {
        self.shortlist.events_by_tag()
    }

    /// Binds the aggregator to `user` and loads that user's saved shortlist
    /// and activity. Missing or unreadable data loads as empty.
    pub async fn load_for(&mut self, user: UserId) {
        self.owner = Some(user);

        let entries: Vec<Event> = self.load_or_default(&keys::shortlist(user)).await;
        self.replace(entries);

        let records: Vec<ActivityRecord> = self.load_or_default(&keys::user_activity(user)).await;
        self.activity = ActivityLog::from_records(records);

        debug!(
            user_id = user.0,
            shortlist = self.shortlist.len(),
            activity = self.activity.len(),
            "loaded user shortlist"
        );
    }

    /// Drops the owner and all in-memory state. Stored data is untouched.
    pub fn detach(&mut self) {
        self.owner = None;
        self.shortlist.clear();
        self.activity.clear();
    }

    /// Saves `event` unless its id is already present. Returns the activity
    /// record when something changed.
    pub async fn add(&mut self, event: &Event) -> Option<ActivityRecord> {
        if !self.shortlist.insert(event.clone()) {
            debug!(event_id = event.id.0, "event already shortlisted");
            return None;
        }
        let record = self
            .activity
            .record(ActivityAction::Saved, event, Utc::now());
        self.persist().await;
        Some(record)
    }

    pub async fn remove(&mut self, event_id: EventId) -> Option<ActivityRecord> {
        let removed = self.shortlist.remove(event_id)?;
        let record = self
            .activity
            .record(ActivityAction::Removed, &removed, Utc::now());
        self.persist().await;
        Some(record)
    }

    /// Bulk-sets the shortlist without recording activity.
    pub fn replace(&mut self, entries: Vec<Event>) {
        self.shortlist.replace(entries);
    }

    /// Empties the shortlist without recording activity.
    pub fn clear(&mut self) {
        self.shortlist.clear();
    }

    async fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match load_json::<T>(self.store.as_ref(), key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err @ StoreError::Malformed { .. }) => {
                warn!(key, error = %err, "discarding malformed saved state");
                T::default()
            }
            Err(err) => {
                warn!(key, error = %err, "saved state unavailable; starting empty");
                T::default()
            }
        }
    }

    async fn persist(&self) {
        let Some(user) = self.owner else {
            debug!("no signed-in user; shortlist kept in memory only");
            return;
        };

        let shortlist_key = keys::shortlist(user);
        if let Err(err) = save_json(self.store.as_ref(), &shortlist_key, self.shortlist.entries()).await
        {
            warn!(key = %shortlist_key, error = %err, "failed to persist shortlist");
        }

        let activity_key = keys::user_activity(user);
        if let Err(err) = save_json(self.store.as_ref(), &activity_key, self.activity.records()).await
        {
            warn!(key = %activity_key, error = %err, "failed to persist activity log");
        }
    }
}

#[cfg(test)]
#[path = "tests/aggregator_tests.rs"]
mod tests;
