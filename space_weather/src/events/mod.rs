//! Event records and identifiers.

mod catalog;

pub use catalog::*;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{StoreError, StoreResult};
use crate::time::parse_timestamp;

/// Intensity reported for a storm with no readings.
pub const NO_INTENSITY: f64 = 0.0;

/// Identifier of an event, `<ISO8601-timestamp>-<TYPE>-<sequence>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The second-to-last hyphen-delimited segment, uppercased.
    pub fn type_code(&self) -> Option<String> {
        self.0.rsplit('-').nth(1).map(|code| code.to_ascii_uppercase())
    }

    /// Recover the event type encoded in the id.
    pub fn parse_type(&self) -> StoreResult<EventType> {
        self.type_code()
            .and_then(|code| EventType::from_code(&code))
            .ok_or_else(|| StoreError::Unparseable(self.0.clone()))
    }

    /// The timestamp prefix of the id, if it parses.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let mut segments = self.0.rsplitn(3, '-');
        let _sequence = segments.next()?;
        let _code = segments.next()?;
        parse_timestamp(segments.next()?)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geomagnetic index reading of a storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpReading {
    pub observed_at: Option<NaiveDateTime>,
    /// Planetary K-index, 0-9.
    pub intensity: f64,
    pub source: Option<String>,
}

impl KpReading {
    pub fn new(intensity: f64) -> Self {
        Self {
            observed_at: None,
            intensity,
            source: None,
        }
    }

    pub fn at(mut self, observed_at: NaiveDateTime) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}

/// A single space-weather phenomenon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    /// Type assigned at ingestion.
    pub event_type: EventType,

    pub start_time: Option<NaiveDateTime>,

    /// Outgoing references to related events, in source order.
    #[serde(default)]
    pub linked_event_ids: Vec<EventId>,

    /// Storm intensity readings; empty for non-storm events.
    #[serde(default)]
    pub kp_readings: Vec<KpReading>,

    pub link: Option<String>,

    /// Attributes not modelled explicitly.
    #[serde(default)]
    pub extra: HashMap<String, serde_json::Value>,

    #[serde(skip)]
    peak: OnceLock<f64>,
}

impl Event {
    /// Create an event of the given type. The start time defaults to the
    /// timestamp encoded in the id.
    pub fn new(id: impl Into<EventId>, event_type: EventType) -> Self {
        let id = id.into();
        let start_time = id.timestamp();
        Self {
            id,
            event_type,
            start_time,
            linked_event_ids: Vec::new(),
            kp_readings: Vec::new(),
            link: None,
            extra: HashMap::new(),
            peak: OnceLock::new(),
        }
    }

    /// Create an event whose type is read from its id.
    pub fn from_id(id: impl Into<EventId>) -> StoreResult<Self> {
        let id = id.into();
        let event_type = id.parse_type()?;
        Ok(Self::new(id, event_type))
    }

    pub fn with_start_time(mut self, start_time: NaiveDateTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_link(mut self, target: impl Into<EventId>) -> Self {
        self.linked_event_ids.push(target.into());
        self
    }

    pub fn with_links(mut self, targets: impl IntoIterator<Item = EventId>) -> Self {
        self.linked_event_ids.extend(targets);
        self
    }

    pub fn with_reading(mut self, reading: KpReading) -> Self {
        self.kp_readings.push(reading);
        self.peak = OnceLock::new();
        self
    }

    pub fn with_readings(mut self, readings: impl IntoIterator<Item = KpReading>) -> Self {
        self.kp_readings.extend(readings);
        self.peak = OnceLock::new();
        self
    }

    pub fn category(&self) -> Category {
        self.event_type.category()
    }

    pub fn is_storm(&self) -> bool {
        self.event_type == EventType::Gst
    }

    /// Maximum reading intensity, [`NO_INTENSITY`] when there are no readings.
    ///
    /// Computed once and cached on the record.
    pub fn peak_intensity(&self) -> f64 {
        *self.peak.get_or_init(|| {
            self.kp_readings
                .iter()
                .map(|r| r.intensity)
                .fold(None, |peak: Option<f64>, v| Some(peak.map_or(v, |p| p.max(v))))
                .unwrap_or(NO_INTENSITY)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_type_code_from_id() {
        let id = EventId::new("2024-05-10T15:00:00-GST-001");
        assert_eq!(id.type_code().as_deref(), Some("GST"));
        assert_eq!(id.parse_type().unwrap(), EventType::Gst);
    }

    #[test]
    fn test_type_code_is_uppercased() {
        let id = EventId::new("2024-05-10T15:00:00-cme-002");
        assert_eq!(id.parse_type().unwrap(), EventType::Cme);
    }

    #[test]
    fn test_unparseable_id() {
        assert!(matches!(
            EventId::new("2024-05-10T15:00:00-XYZ-001").parse_type(),
            Err(StoreError::Unparseable(_))
        ));
        assert!(EventId::new("garbage").parse_type().is_err());
    }

    #[test]
    fn test_id_timestamp() {
        let id = EventId::new("2024-05-10T17:36:00-CME-001");
        let ts = id.timestamp().unwrap();
        assert_eq!(ts.hour(), 17);
        assert_eq!(ts.minute(), 36);
        assert!(EventId::new("CME-001").timestamp().is_none());
    }

    #[test]
    fn test_new_event_takes_start_from_id() {
        let event = Event::new("2024-05-10T15:00:00-GST-001", EventType::Gst);
        assert_eq!(event.start_time, EventId::new("2024-05-10T15:00:00-GST-001").timestamp());
        assert!(event.is_storm());
        assert_eq!(event.category(), Category::Impact);
    }

    #[test]
    fn test_peak_intensity() {
        let storm = Event::new("2024-05-10T15:00:00-GST-001", EventType::Gst)
            .with_reading(KpReading::new(5.33))
            .with_reading(KpReading::new(8.67))
            .with_reading(KpReading::new(7.0));
        assert_eq!(storm.peak_intensity(), 8.67);
        // cached value is stable
        assert_eq!(storm.peak_intensity(), 8.67);
    }

    #[test]
    fn test_peak_intensity_without_readings() {
        let storm = Event::new("2024-05-10T15:00:00-GST-001", EventType::Gst);
        assert_eq!(storm.peak_intensity(), NO_INTENSITY);
    }

    #[test]
    fn test_from_id() {
        let event = Event::from_id("2024-05-09T20:00:00-HSS-001").unwrap();
        assert_eq!(event.event_type, EventType::Hss);
        assert!(Event::from_id("2024-05-09T20:00:00-ABC-001").is_err());
    }
}
