//! Read-only summaries rendered by the profile page and navigation bar.

use chrono::{DateTime, Utc};
use shared::domain::{ActivityRecord, CurrentUser, Event};

use crate::aggregator::ShortlistAggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationBadges {
    pub shortlist: usize,
    pub tags: usize,
}

impl NavigationBadges {
    pub fn from_aggregator(aggregator: &ShortlistAggregator) -> Self {
        Self {
            shortlist: aggregator.entries().len(),
            tags: aggregator.unique_tags().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStat {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub tag: String,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub record: ActivityRecord,
    pub relative_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub display_name: String,
    pub email: String,
    pub avatar_initial: String,
    pub total_events: usize,
    pub total_tags: usize,
    pub tag_stats: Vec<TagStat>,
    pub tag_groups: Vec<TagGroup>,
    pub timeline: Vec<TimelineEntry>,
}

impl ProfileSummary {
    pub fn build(
        user: &CurrentUser,
        aggregator: &ShortlistAggregator,
        now: DateTime<Utc>,
    ) -> Self {
        let unique_tags = aggregator.unique_tags();
        let counts = aggregator.tag_counts();
        let tag_stats = unique_tags
            .iter()
            .map(|tag| TagStat {
                tag: tag.clone(),
                count: counts.get(tag).copied().unwrap_or(0),
            })
            .collect();

        let tag_groups = aggregator
            .events_by_tag()
            .into_iter()
            .map(|(tag, events)| TagGroup {
                tag,
                events: events.into_iter().cloned().collect(),
            })
            .collect();

        let timeline = aggregator
            .activity()
            .iter()
            .map(|record| TimelineEntry {
                relative_time: format_relative_time(now, record.timestamp),
                record: record.clone(),
            })
            .collect();

        Self {
            display_name: user.name.clone(),
            email: user.email.clone(),
            avatar_initial: avatar_initial(&user.name),
            total_events: aggregator.entries().len(),
            total_tags: unique_tags.len(),
            tag_stats,
            tag_groups,
            timeline,
        }
    }
}

pub fn avatar_initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|first| first.to_uppercase().collect())
        .unwrap_or_default()
}

/// Coarse "time ago" label. Future timestamps count as "Just now".
pub fn format_relative_time(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(hours / 24, "day")
}

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}
