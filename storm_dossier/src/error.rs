//! Caller-visible failures of dossier operations.

use space_weather::{EventId, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum DossierError {
    /// The selector found no candidate storms.
    #[error("no storms found for year {year}")]
    NotFound { year: i32 },

    /// A requested root event is not in the store.
    #[error("event {0} not found in store")]
    UnknownEvent(EventId),

    /// An operation ran before any event store was installed.
    #[error("event store not ready; load it before querying")]
    StoreUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type DossierResult<T> = Result<T, DossierError>;
