//! The fixed catalog of space-weather event types.
//!
//! Every type belongs to one of four ordered phases and carries a static
//! impact weight used for dominant-cause scoring.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::StoreError;

/// Phase of a storm chain an event type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Solar origin of the disturbance.
    Cause,
    /// Disturbance travelling through the heliosphere.
    Transit,
    /// Arrival at Earth.
    Impact,
    /// Lingering aftermath.
    PostImpact,
}

impl Category {
    /// All categories in phase order.
    pub const ALL: [Category; 4] = [
        Category::Cause,
        Category::Transit,
        Category::Impact,
        Category::PostImpact,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Cause => "Cause",
            Category::Transit => "Transit",
            Category::Impact => "Impact",
            Category::PostImpact => "Post-Impact",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Space-weather event types, ordered alphabetically by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// Coronal mass ejection.
    Cme,
    /// Solar flare.
    Flr,
    /// Geomagnetic storm.
    Gst,
    /// High-speed solar-wind stream.
    Hss,
    /// Interplanetary shock.
    Ips,
    /// Magnetopause crossing.
    Mpc,
    /// Radiation-belt enhancement.
    Rbe,
    /// Solar energetic particle event.
    Sep,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::Cme,
        EventType::Flr,
        EventType::Gst,
        EventType::Hss,
        EventType::Ips,
        EventType::Mpc,
        EventType::Rbe,
        EventType::Sep,
    ];

    /// Three-letter type code as it appears inside event ids.
    pub fn code(&self) -> &'static str {
        match self {
            EventType::Cme => "CME",
            EventType::Flr => "FLR",
            EventType::Gst => "GST",
            EventType::Hss => "HSS",
            EventType::Ips => "IPS",
            EventType::Mpc => "MPC",
            EventType::Rbe => "RBE",
            EventType::Sep => "SEP",
        }
    }

    /// Look up a type by its code, ignoring ASCII case.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(code))
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            EventType::Cme => "Coronal Mass Ejection",
            EventType::Flr => "Solar Flare",
            EventType::Gst => "Geomagnetic Storm",
            EventType::Hss => "High-Speed Stream",
            EventType::Ips => "Interplanetary Shock",
            EventType::Mpc => "Magnetopause Crossing",
            EventType::Rbe => "Radiation Belt Enhancement",
            EventType::Sep => "Solar Energetic Particle Event",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EventType::Cme => "A vast cloud of plasma and magnetic field thrown off by the Sun. It takes one to three days to arrive and drives the largest storms.",
            EventType::Flr => "A burst of radiation that reaches Earth in about eight minutes and causes radio blackouts.",
            EventType::Gst => "A global disturbance of Earth's magnetic field. Brings auroras, power-grid faults and GPS trouble.",
            EventType::Hss => "A steady fast solar-wind flow from coronal holes. Drives weaker but longer-lasting storms.",
            EventType::Ips => "The shock front ahead of a CME or HSS. Its detection marks the imminent arrival of the main disturbance.",
            EventType::Mpc => "The moment the shock compresses Earth's magnetosphere, the first physical contact.",
            EventType::Rbe => "The filling of the Van Allen belts with energetic particles after a storm. A lasting hazard for satellites.",
            EventType::Sep => "A barrage of high-energy particles arriving within minutes to hours. A risk for astronauts and satellites.",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            EventType::Flr | EventType::Cme | EventType::Hss => Category::Cause,
            EventType::Sep | EventType::Ips => Category::Transit,
            EventType::Mpc | EventType::Gst => Category::Impact,
            EventType::Rbe => Category::PostImpact,
        }
    }

    /// Static weight used for dominant-cause scoring.
    pub fn impact_weight(&self) -> u32 {
        match self {
            EventType::Flr => 7,
            EventType::Cme => 9,
            EventType::Hss => 6,
            EventType::Sep => 8,
            EventType::Ips => 5,
            EventType::Mpc => 4,
            EventType::Gst => 10,
            EventType::Rbe => 7,
        }
    }

    /// Types belonging to a category, alphabetical by code.
    pub fn in_category(category: Category) -> impl Iterator<Item = EventType> {
        Self::ALL.into_iter().filter(move |t| t.category() == category)
    }
}

// Ordering follows the code string so that every sorted iteration over types
// is alphabetical.
impl PartialOrd for EventType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.code().cmp(other.code())
    }
}

impl FromStr for EventType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| StoreError::Unparseable(s.to_string()))
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
