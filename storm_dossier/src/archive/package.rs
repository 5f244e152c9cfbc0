//! The story package handed to clients.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use space_weather::{Event, EventId};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::dossier::Dossier;
use crate::linkage::LinkageClosure;
use crate::narrative::{NarrativeOutcome, Persona};

/// Unique identifier for generated packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub Uuid);

impl PackageId {
    /// Create a new random package ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PackageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The selected storm, as reported in a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormDetails {
    pub id: EventId,
    pub start_time: Option<NaiveDateTime>,
    pub peak_kp: f64,
}

impl From<&Event> for StormDetails {
    fn from(storm: &Event) -> Self {
        Self {
            id: storm.id.clone(),
            start_time: storm.start_time,
            peak_kp: storm.peak_intensity(),
        }
    }
}

/// Everything generated for one storm: the dossier and every storyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryPackage {
    pub id: PackageId,
    pub storm: StormDetails,
    pub closure: LinkageClosure,
    /// Full records of the closure entries held by the store, in id order.
    pub events: Vec<Event>,
    pub dossier: Dossier,
    pub storylines: BTreeMap<Persona, NarrativeOutcome>,
}

impl StoryPackage {
    pub fn storyline(&self, persona: Persona) -> Option<&NarrativeOutcome> {
        self.storylines.get(&persona)
    }
}
