//! Persisted key layout. Per-user keys embed the user id so several
//! accounts can share one store.

use shared::domain::UserId;

pub const CURRENT_USER: &str = "currentUser";
pub const APP_STATE: &str = "appState";

const SHORTLIST_PREFIX: &str = "shortlist_";
const USER_ACTIVITY_PREFIX: &str = "userActivity_";

pub fn shortlist(user_id: UserId) -> String {
    format!("{SHORTLIST_PREFIX}{}", user_id.0)
}

pub fn user_activity(user_id: UserId) -> String {
    format!("{USER_ACTIVITY_PREFIX}{}", user_id.0)
}

/// Every key that holds data belonging to `user_id`.
pub fn user_scoped(user_id: UserId) -> [String; 2] {
    [shortlist(user_id), user_activity(user_id)]
}

/// Recovers the owning user from a per-user key.
pub fn owner_of(key: &str) -> Option<UserId> {
    key.strip_prefix(SHORTLIST_PREFIX)
        .or_else(|| key.strip_prefix(USER_ACTIVITY_PREFIX))
        .and_then(|raw| raw.parse::<i64>().ok())
        .map(UserId)
}
