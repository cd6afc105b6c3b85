use std::collections::{BTreeMap, BTreeSet, HashSet};

use shared::domain::{Event, EventId};

/// Saved events in the order they were saved. Ids are unique.
///
/// Tag views are computed from the entries on every call; nothing is cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shortlist {
    entries: Vec<Event>,
}

impl Shortlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a shortlist from restored entries, keeping the first entry for
    /// any repeated id.
    pub fn from_entries(entries: Vec<Event>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let entries = entries
            .into_iter()
            .filter(|event| seen.insert(event.id))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[Event] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.entries.iter().any(|event| event.id == id)
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.entries.iter().find(|event| event.id == id)
    }

    pub fn insert(&mut self, event: Event) -> bool {
        if self.contains(event.id) {
            return false;
        }
        self.entries.push(event);
        true
    }

    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let index = self.entries.iter().position(|event| event.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn replace(&mut self, entries: Vec<Event>) {
        *self = Self::from_entries(entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn unique_tags(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|event| event.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Occurrences of each tag across entries. A tag listed twice on one
    /// event counts twice.
    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for tag in self.entries.iter().flat_map(|event| event.tags.iter()) {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Entries grouped by tag, each group in shortlist order. Group sizes
    /// match `tag_counts`.
    pub fn events_by_tag(&self) -> BTreeMap<String, Vec<&Event>> {
        let mut groups: BTreeMap<String, Vec<&Event>> = BTreeMap::new();
        for event in &self.entries {
            for tag in &event.tags {
                groups.entry(tag.clone()).or_default().push(event);
            }
        }
        groups
    }
}

#[cfg(test)]
#[path = "tests/shortlist_tests.rs"]
mod tests;
