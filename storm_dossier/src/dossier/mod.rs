//! Dossier classifier.
//!
//! Turns a linkage closure plus its root storm into a [`Dossier`]:
//! 1. **Typing**: entries without a known type are dropped
//! 2. **Counting**: frequency per event type
//! 3. **Bucketing**: `"<count>x <CODE> (<name>)"` per category, alphabetical by code
//! 4. **Dominant cause**: highest `count * impact_weight` among cause types,
//!    exact ties going to the alphabetically first code
//! 5. **Intensity**: peak Kp of the root storm
//! 6. **Consequence**: MPC and GST, else GST alone, else minimal
//! 7. **Outlook**: RBE present or not
//!
//! Classification is total: an empty closure gives an empty, undetermined dossier.

mod outcome;

pub use outcome::*;

use outcome::count_label;

use serde::{Deserialize, Serialize};
use space_weather::{Category, Event, EventType};
use std::collections::BTreeMap;
use tracing::debug;

use crate::linkage::LinkageClosure;

/// Classification of a storm's event cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
    /// Events per type; only types that occur are present.
    pub type_counts: BTreeMap<EventType, usize>,

    /// Formatted counts per category. Every category is present.
    pub category_summary: BTreeMap<Category, Vec<String>>,

    pub dominant_cause: DominantCause,

    pub consequence: Consequence,

    pub outlook: Outlook,

    /// Peak Kp of the root storm.
    pub peak_kp: f64,

    /// Closure entries left out because their type is unknown.
    pub excluded: usize,
}

impl Dossier {
    pub fn count(&self, event_type: EventType) -> usize {
        self.type_counts.get(&event_type).copied().unwrap_or(0)
    }

    pub fn bucket(&self, category: Category) -> &[String] {
        self.category_summary
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has(&self, event_type: EventType) -> bool {
        self.count(event_type) > 0
    }

    pub fn total_events(&self) -> usize {
        self.type_counts.values().sum()
    }
}

/// Classify a closure around its root storm. Never fails.
pub fn classify(closure: &LinkageClosure, root_storm: &Event) -> Dossier {
    let mut type_counts: BTreeMap<EventType, usize> = BTreeMap::new();
    let mut excluded = 0;

    for entry in closure.entries() {
        match entry.event_type {
            Some(event_type) => *type_counts.entry(event_type).or_default() += 1,
            None => {
                debug!(id = %entry.id, "excluding event with unknown type");
                excluded += 1;
            }
        }
    }

    let mut category_summary: BTreeMap<Category, Vec<String>> =
        Category::ALL.into_iter().map(|c| (c, Vec::new())).collect();
    for (event_type, count) in &type_counts {
        category_summary
            .entry(event_type.category())
            .or_default()
            .push(count_label(*event_type, *count));
    }

    let dominant_cause = dominant_cause(&type_counts);
    let peak_kp = root_storm.peak_intensity();

    let has = |t: EventType| type_counts.contains_key(&t);
    let consequence = if has(EventType::Mpc) && has(EventType::Gst) {
        Consequence::ShieldBreachThenStorm { peak_kp }
    } else if has(EventType::Gst) {
        Consequence::StormOnly { peak_kp }
    } else {
        Consequence::Minimal
    };

    let outlook = if has(EventType::Rbe) {
        Outlook::ElevatedSatelliteRisk
    } else {
        Outlook::MinimalLongTerm
    };

    Dossier {
        type_counts,
        category_summary,
        dominant_cause,
        consequence,
        outlook,
        peak_kp,
        excluded,
    }
}

fn dominant_cause(type_counts: &BTreeMap<EventType, usize>) -> DominantCause {
    // BTreeMap iterates alphabetically, so keeping the first strict maximum
    // resolves ties to the smallest code.
    let mut best: Option<(EventType, usize, usize)> = None;

    for (&event_type, &count) in type_counts {
        if event_type.category() != Category::Cause {
            continue;
        }
        let score = count.saturating_mul(event_type.impact_weight() as usize);
        if best.map_or(true, |(_, _, top)| score > top) {
            best = Some((event_type, count, score));
        }
    }

    match best {
        Some((event_type, count, score)) => DominantCause::Identified {
            event_type,
            count,
            score,
        },
        None => DominantCause::Undetermined,
    }
}
