//! Configuration for locating and reading the on-disk event cache.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::events::EventType;

pub const DEFAULT_CACHE_DIR: &str = "backend/cache";
pub const DEFAULT_FILE_PREFIX: &str = "nasa_";

/// Where the event cache lives and how its records are keyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON array per event type.
    pub cache_dir: PathBuf,
    /// File name prefix; a cache file is `<prefix><type code lowercase>.json`.
    pub file_prefix: String,
    /// Per-type override of the record field holding the event id, keyed by type code.
    pub id_fields: BTreeMap<String, String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            id_fields: BTreeMap::new(),
        }
    }
}

impl StoreConfig {
    pub fn with_cache_dir(mut self, cache_dir: impl AsRef<Path>) -> Self {
        self.cache_dir = cache_dir.as_ref().to_path_buf();
        self
    }

    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml(text: &str) -> StoreResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Record field holding the id for events of this type.
    pub fn id_field(&self, event_type: EventType) -> &str {
        self.id_fields
            .get(event_type.code())
            .map(String::as_str)
            .unwrap_or_else(|| default_id_field(event_type))
    }

    /// Cache file for an event type.
    pub fn cache_file(&self, event_type: EventType) -> PathBuf {
        self.cache_dir.join(format!(
            "{}{}.json",
            self.file_prefix,
            event_type.code().to_ascii_lowercase()
        ))
    }
}

fn default_id_field(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Cme => "activityID",
        EventType::Flr => "flrID",
        EventType::Gst => "gstID",
        EventType::Hss => "hssID",
        EventType::Ips => "ipsID",
        EventType::Mpc => "mpcID",
        EventType::Rbe => "rbeID",
        EventType::Sep => "sepID",
    }
}
