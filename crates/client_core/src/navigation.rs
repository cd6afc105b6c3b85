use shared::domain::{AppStateSnapshot, View};
use storage::{keys, load_json, save_json, KeyValueStore, StoreError};
use tracing::warn;

/// A saved view is only restored if it was written less than an hour ago.
pub const APP_STATE_TTL_MS: i64 = 3_600_000;

/// Keyboard shortcuts understood on the discover view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ArrowLeft,
    ArrowRight,
}

impl KeyCommand {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

pub fn restorable_view(snapshot: &AppStateSnapshot, now_ms: i64) -> Option<View> {
    (now_ms - snapshot.timestamp < APP_STATE_TTL_MS).then_some(snapshot.current_view)
}

pub async fn save_app_state(
    store: &dyn KeyValueStore,
    view: View,
    now_ms: i64,
) -> Result<(), StoreError> {
    let snapshot = AppStateSnapshot {
        current_view: view,
        timestamp: now_ms,
    };
    save_json(store, keys::APP_STATE, &snapshot).await
}

pub async fn load_app_state(store: &dyn KeyValueStore) -> Option<AppStateSnapshot> {
    match load_json(store, keys::APP_STATE).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "ignoring saved app state");
            None
        }
    }
}
