//! Loading the event store from a directory of cached JSON arrays.
//!
//! Each event type has its own file, `<prefix><code>.json`, holding an array
//! of records in the DONKI layout:
//!
//! ```json
//! [{ "gstID": "2024-05-10T15:00:00-GST-001",
//!    "startTime": "2024-05-10T15:00Z",
//!    "allKpIndex": [{ "observedTime": "2024-05-10T18:00Z", "kpIndex": 8.67, "source": "NOAA" }],
//!    "linkedEvents": [{ "activityID": "2024-05-08T05:36:00-CME-001" }] }]
//! ```

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::EventStore;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::events::{Event, EventId, EventType, KpReading};
use crate::time::parse_timestamp;

const START_TIME_FIELDS: &[&str] = &["startTime", "beginTime", "eventTime"];
const LINKED_EVENTS_FIELD: &str = "linkedEvents";
const LINKED_ID_FIELD: &str = "activityID";
const READINGS_FIELD: &str = "allKpIndex";
const LINK_FIELD: &str = "link";

/// Load every per-type cache file found in the configured directory.
///
/// Missing, unreadable or malformed files are logged and skipped; only a
/// missing directory is an error.
pub fn load_cache_dir(config: &StoreConfig) -> StoreResult<EventStore> {
    if !config.cache_dir.is_dir() {
        return Err(StoreError::CacheDirMissing(config.cache_dir.clone()));
    }

    let mut store = EventStore::new();

    for event_type in EventType::ALL {
        let path = config.cache_file(event_type);
        if !path.exists() {
            warn!(path = %path.display(), event_type = %event_type, "cache file not found, skipping");
            continue;
        }

        match load_cache_file(&path, event_type, config) {
            Ok(events) => {
                debug!(event_type = %event_type, count = events.len(), "loaded cache file");
                for event in events {
                    store.insert(event);
                }
            }
            Err(err) => warn!(error = %err, "skipping unusable cache file"),
        }
    }

    info!(
        events = store.len(),
        storms = store.count_of_type(EventType::Gst),
        "event store loaded"
    );
    Ok(store)
}

/// Read one cache file of events of a single type.
///
/// Records without their id field are dropped.
pub fn load_cache_file(
    path: &Path,
    event_type: EventType,
    config: &StoreConfig,
) -> StoreResult<Vec<Event>> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<Value> = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let id_field = config.id_field(event_type);
    let total = records.len();
    let events: Vec<Event> = records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(fields) => parse_record(fields, event_type, id_field),
            _ => None,
        })
        .collect();

    if events.len() < total {
        debug!(
            path = %path.display(),
            skipped = total - events.len(),
            "records without a usable id were skipped"
        );
    }

    Ok(events)
}

/// Convert one raw record into an [`Event`].
pub fn parse_record(
    mut fields: Map<String, Value>,
    event_type: EventType,
    id_field: &str,
) -> Option<Event> {
    let id = match fields.remove(id_field) {
        Some(Value::String(id)) if !id.is_empty() => EventId::new(id),
        _ => return None,
    };

    let mut event = Event::new(id, event_type);

    if let Some(start) = START_TIME_FIELDS
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find_map(parse_timestamp)
    {
        event.start_time = Some(start);
    }

    if let Some(Value::Array(links)) = fields.remove(LINKED_EVENTS_FIELD) {
        event.linked_event_ids = links
            .iter()
            .filter_map(|link| link.get(LINKED_ID_FIELD).and_then(Value::as_str))
            .filter(|id| !id.is_empty())
            .map(EventId::from)
            .collect();
    }

    if let Some(Value::Array(readings)) = fields.remove(READINGS_FIELD) {
        event = event.with_readings(readings.iter().filter_map(parse_reading));
    }

    if let Some(Value::String(link)) = fields.remove(LINK_FIELD) {
        event.link = Some(link);
    }

    for key in START_TIME_FIELDS {
        if let Some(value) = fields.remove(*key) {
            event.extra.insert((*key).to_string(), value);
        }
    }
    event.extra.extend(fields);

    Some(event)
}

fn parse_reading(raw: &Value) -> Option<KpReading> {
    let fields = raw.as_object()?;
    Some(KpReading {
        observed_at: fields
            .get("observedTime")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
        intensity: fields
            .get("kpIndex")
            .and_then(Value::as_f64)
            .unwrap_or(crate::events::NO_INTENSITY),
        source: fields
            .get("source")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}
