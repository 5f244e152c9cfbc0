//! Structured outcomes of classification.
//!
//! These are tags with parameters, not text; the narrative module renders them.

use serde::{Deserialize, Serialize};
use space_weather::EventType;

/// Label of the dominant cause when no cause-category event is present.
pub const UNDETERMINED_CAUSE: &str = "undetermined";

/// The cause type with the highest weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DominantCause {
    Identified {
        event_type: EventType,
        count: usize,
        /// `count * impact_weight`.
        score: usize,
    },
    Undetermined,
}

impl DominantCause {
    pub fn event_type(&self) -> Option<EventType> {
        match self {
            DominantCause::Identified { event_type, .. } => Some(*event_type),
            DominantCause::Undetermined => None,
        }
    }

    /// `"<count>x <CODE> (<full name>)"`, or [`UNDETERMINED_CAUSE`].
    pub fn label(&self) -> String {
        match self {
            DominantCause::Identified {
                event_type, count, ..
            } => count_label(*event_type, *count),
            DominantCause::Undetermined => UNDETERMINED_CAUSE.to_string(),
        }
    }
}

/// What happened at Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Consequence {
    /// The magnetopause was crossed and a geomagnetic storm followed.
    ShieldBreachThenStorm { peak_kp: f64 },
    /// A geomagnetic storm without a recorded magnetopause crossing.
    StormOnly { peak_kp: f64 },
    /// No registered geomagnetic impact.
    Minimal,
}

/// What lingers after the storm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    /// Radiation belts were enhanced; satellites stay at risk.
    ElevatedSatelliteRisk,
    MinimalLongTerm,
}

pub(crate) fn count_label(event_type: EventType, count: usize) -> String {
    format!("{}x {} ({})", count, event_type.code(), event_type.full_name())
}
