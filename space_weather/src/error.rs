//! Errors raised while loading or querying space-weather events.

use std::path::PathBuf;

/// Errors produced by the event store and its loader.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cache directory not found: {}", .0.display())]
    CacheDirMissing(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed event cache {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The id does not encode one of the known event type codes.
    #[error("event id {0:?} does not encode a known event type")]
    Unparseable(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
