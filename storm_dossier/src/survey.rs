//! Store-wide storm statistics.
//!
//! Unlike the selector, which works within one year, these look at every
//! storm in the store: which causes the strongest storms link to, and how
//! many storms each year had.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use space_weather::{Event, EventLookup, EventType, NO_INTENSITY};
use std::collections::BTreeMap;
use tracing::debug;

/// Linked-event type frequencies over the strongest storms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseFrequencies {
    /// How many storms were examined (at most the requested `top_n`).
    pub storms_analyzed: usize,

    /// Linked events per type, typed from their ids.
    pub counts: BTreeMap<EventType, usize>,

    /// Linked ids whose type could not be read.
    pub excluded: usize,
}

impl CauseFrequencies {
    pub fn count(&self, event_type: EventType) -> usize {
        self.counts.get(&event_type).copied().unwrap_or(0)
    }

    /// Types by descending count; equal counts in code order.
    pub fn most_common(&self) -> Vec<(EventType, usize)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(t, c)| (*t, *c)).collect();
        // stable, so ties keep the map's code order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Every storm with a positive peak, strongest first.
///
/// Storms with equal peaks keep the store's enumeration order.
pub fn strongest_storms<S>(store: &S) -> Vec<&Event>
where
    S: EventLookup + ?Sized,
{
    let mut storms: Vec<&Event> = store
        .all_of_type(EventType::Gst)
        .into_iter()
        .filter(|storm| storm.peak_intensity() > NO_INTENSITY)
        .collect();
    storms.sort_by(|a, b| b.peak_intensity().total_cmp(&a.peak_intensity()));
    storms
}

/// Count the types of the events directly linked from the `top_n` strongest
/// storms of the whole store.
///
/// Storms without readings are not ranked. Only direct links are counted,
/// not the full linkage closure.
pub fn cause_frequencies<S>(store: &S, top_n: usize) -> CauseFrequencies
where
    S: EventLookup + ?Sized,
{
    let mut storms = strongest_storms(store);
    storms.truncate(top_n);

    let mut frequencies = CauseFrequencies {
        storms_analyzed: storms.len(),
        ..CauseFrequencies::default()
    };

    for linked in storms.iter().flat_map(|storm| &storm.linked_event_ids) {
        match linked.parse_type() {
            Ok(event_type) => *frequencies.counts.entry(event_type).or_default() += 1,
            Err(_) => {
                debug!(id = %linked, "linked id has no readable type");
                frequencies.excluded += 1;
            }
        }
    }

    debug!(
        storms = frequencies.storms_analyzed,
        links = frequencies.counts.values().sum::<usize>(),
        "cause frequencies computed"
    );
    frequencies
}

/// Number of storms starting in each year.
///
/// Storms without a parseable start time are not counted.
pub fn storm_counts_by_year<S>(store: &S) -> BTreeMap<i32, usize>
where
    S: EventLookup + ?Sized,
{
    let mut counts = BTreeMap::new();
    for start in store
        .all_of_type(EventType::Gst)
        .into_iter()
        .filter_map(|storm| storm.start_time)
    {
        *counts.entry(start.year()).or_default() += 1;
    }
    counts
}
