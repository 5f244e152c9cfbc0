//! Storm selection: one of the strongest storms of a given year.

use chrono::Datelike;
use rand::seq::SliceRandom;
use rand::Rng;
use space_weather::{Event, EventLookup, EventType};
use tracing::info;

use crate::config::DEFAULT_TOP_K;
use crate::error::{DossierError, DossierResult};

/// Picks a storm at random among the `top_k` strongest of a year.
#[derive(Debug, Clone, Copy)]
pub struct StormSelector {
    top_k: usize,
}

impl Default for StormSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl StormSelector {
    /// A `top_k` of zero is treated as one.
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k: top_k.max(1),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// All storms starting in `year`, strongest first.
    ///
    /// Storms with equal peak intensity keep the store's enumeration order.
    /// Storms without a parseable start time are never candidates.
    pub fn ranked<'a, S>(&self, year: i32, store: &'a S) -> Vec<&'a Event>
    where
        S: EventLookup + ?Sized,
    {
        let mut storms: Vec<&Event> = store
            .all_of_type(EventType::Gst)
            .into_iter()
            .filter(|storm| storm.start_time.is_some_and(|t| t.year() == year))
            .collect();

        // sort_by is stable
        storms.sort_by(|a, b| b.peak_intensity().total_cmp(&a.peak_intensity()));
        storms
    }

    /// The eligible storms of a year: the first `top_k` of [`Self::ranked`].
    pub fn candidates<'a, S>(&self, year: i32, store: &'a S) -> Vec<&'a Event>
    where
        S: EventLookup + ?Sized,
    {
        let mut ranked = self.ranked(year, store);
        ranked.truncate(self.top_k);
        ranked
    }

    /// Pick a storm for `year` using the thread-local RNG.
    pub fn select<'a, S>(&self, year: i32, store: &'a S) -> DossierResult<&'a Event>
    where
        S: EventLookup + ?Sized,
    {
        self.select_with_rng(year, store, &mut rand::thread_rng())
    }

    /// Pick a storm for `year` with a specific RNG (useful for testing).
    pub fn select_with_rng<'a, S, R>(
        &self,
        year: i32,
        store: &'a S,
        rng: &mut R,
    ) -> DossierResult<&'a Event>
    where
        S: EventLookup + ?Sized,
        R: Rng + ?Sized,
    {
        let candidates = self.candidates(year, store);
        let chosen = candidates
            .choose(rng)
            .copied()
            .ok_or(DossierError::NotFound { year })?;

        info!(
            year,
            storm = %chosen.id,
            peak_kp = chosen.peak_intensity(),
            candidates = candidates.len(),
            "storm selected"
        );
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use space_weather::{EventStore, KpReading};

    fn storm(id: &str, kp: Option<f64>) -> Event {
        let event = Event::from_id(id).unwrap();
        match kp {
            Some(kp) => event.with_reading(KpReading::new(kp)),
            None => event,
        }
    }

    fn year_store() -> EventStore {
        vec![
            storm("2024-01-05T00:00:00-GST-001", Some(5.0)),
            storm("2024-03-24T14:00:00-GST-001", Some(8.0)),
            storm("2024-05-10T15:00:00-GST-001", Some(9.0)),
            storm("2024-08-12T03:00:00-GST-001", Some(8.0)),
            storm("2024-10-10T15:00:00-GST-001", None),
            storm("2023-04-23T18:00:00-GST-001", Some(9.0)),
            Event::from_id("2024-05-08T05:36:00-CME-001").unwrap(),
        ]
        .into_iter()
        .collect()
    }

    fn ids<'a>(events: &[&'a Event]) -> Vec<&'a str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_ranked_is_stable_and_filters_year() {
        let store = year_store();
        let ranked = StormSelector::default().ranked(2024, &store);

        assert_eq!(
            ids(&ranked),
            vec![
                "2024-05-10T15:00:00-GST-001",
                "2024-03-24T14:00:00-GST-001",
                "2024-08-12T03:00:00-GST-001",
                "2024-01-05T00:00:00-GST-001",
                "2024-10-10T15:00:00-GST-001",
            ]
        );
    }

    #[test]
    fn test_zero_peak_storm_is_a_candidate() {
        let store: EventStore = vec![storm("2021-06-01T00:00:00-GST-001", None)]
            .into_iter()
            .collect();
        let chosen = StormSelector::default().select(2021, &store).unwrap();
        assert_eq!(chosen.peak_intensity(), 0.0);
    }

    #[test]
    fn test_candidates_truncate_to_top_k() {
        let store = year_store();
        let selector = StormSelector::new(2);
        assert_eq!(
            ids(&selector.candidates(2024, &store)),
            vec!["2024-05-10T15:00:00-GST-001", "2024-03-24T14:00:00-GST-001"]
        );
        // fewer storms than k: take them all
        assert_eq!(StormSelector::new(10).candidates(2024, &store).len(), 5);
    }

    #[test]
    fn test_selection_stays_in_top_k() {
        let store = year_store();
        let selector = StormSelector::new(3);
        let allowed = ids(&selector.candidates(2024, &store));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let chosen = selector.select_with_rng(2024, &store, &mut rng).unwrap();
            assert!(allowed.contains(&chosen.id.as_str()));
        }
    }

    #[test]
    fn test_no_storms_in_year() {
        let store = year_store();
        let result = StormSelector::default().select(1999, &store);
        assert!(matches!(result, Err(DossierError::NotFound { year: 1999 })));
    }

    #[test]
    fn test_zero_top_k_means_one() {
        let store = year_store();
        let selector = StormSelector::new(0);
        assert_eq!(selector.top_k(), 1);
        let chosen = selector.select(2024, &store).unwrap();
        assert_eq!(chosen.id.as_str(), "2024-05-10T15:00:00-GST-001");
    }
}
