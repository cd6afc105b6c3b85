use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EventId);
id_newtype!(UserId);
id_newtype!(ActivityId);

/// A catalog entry. Events are immutable once loaded; the shortlist and the
/// activity log hold copies rather than references into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub emoji: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Event {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Saved,
    Removed,
}

impl ActivityAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Saved => "Saved",
            Self::Removed => "Removed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Saved => "♥",
            Self::Removed => "✕",
        }
    }
}

/// Snapshot of a save/remove decision. The event fields are copied at record
/// time so the entry survives the event leaving the shortlist or catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub action: ActivityAction,
    pub event_id: EventId,
    pub event_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Discover,
    Shortlist,
    Profile,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Shortlist => "shortlist",
            Self::Profile => "profile",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "discover" => Some(Self::Discover),
            "shortlist" => Some(Self::Shortlist),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

/// Last-viewed tab, stamped with epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateSnapshot {
    pub current_view: View,
    pub timestamp: i64,
}
