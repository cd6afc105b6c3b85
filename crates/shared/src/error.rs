use thiserror::Error;

use crate::domain::EventId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog lists event {0} more than once")]
    DuplicateEventId(EventId),
    #[error("catalog payload is not valid event JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}
