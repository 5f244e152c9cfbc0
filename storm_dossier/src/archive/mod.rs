//! The storm archive: an installable event-store snapshot plus the
//! operations that run against it.
//!
//! Every operation fails fast with [`DossierError::StoreUnavailable`] until a
//! store has been installed. Reloading swaps in a whole new snapshot; readers
//! holding the previous one keep using it undisturbed.

mod package;

pub use package::*;

use rand::Rng;
use space_weather::{load_cache_dir, Event, EventId, EventStore, StoreConfig};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::config::DossierConfig;
use crate::dossier::{classify, Dossier};
use crate::error::{DossierError, DossierResult};
use crate::linkage::{closure, LinkageClosure};
use crate::narrative::NarrativeRenderer;
use crate::selector::StormSelector;
use crate::survey::{cause_frequencies, storm_counts_by_year, CauseFrequencies};

/// Holds the current event-store snapshot.
#[derive(Debug, Default)]
pub struct StormArchive {
    config: DossierConfig,
    snapshot: RwLock<Option<Arc<EventStore>>>,
}

impl StormArchive {
    /// Create an archive with no store loaded.
    pub fn new(config: DossierConfig) -> Self {
        Self {
            config,
            snapshot: RwLock::new(None),
        }
    }

    /// Create an archive that is ready immediately.
    pub fn with_store(config: DossierConfig, store: EventStore) -> Self {
        let archive = Self::new(config);
        archive.install(store);
        archive
    }

    pub fn config(&self) -> &DossierConfig {
        &self.config
    }

    /// Replace the current snapshot with `store`.
    pub fn install(&self, store: EventStore) {
        let events = store.len();
        let storms = store.storms().len();
        let mut guard = self.snapshot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(store));
        info!(events, storms, "event store snapshot installed");
    }

    /// Load the configured cache directory and install it.
    pub fn load(&self) -> DossierResult<()> {
        self.load_from(&self.config.store)
    }

    /// Load a cache directory and install it.
    pub fn load_from(&self, store_config: &StoreConfig) -> DossierResult<()> {
        let store = load_cache_dir(store_config)?;
        self.install(store);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.read_snapshot().is_some()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> DossierResult<Arc<EventStore>> {
        self.read_snapshot().ok_or(DossierError::StoreUnavailable)
    }

    fn read_snapshot(&self) -> Option<Arc<EventStore>> {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Linkage closure of `root` in the current snapshot.
    pub fn closure(&self, root: &EventId) -> DossierResult<LinkageClosure> {
        let store = self.snapshot()?;
        Ok(closure(root, store.as_ref()))
    }

    /// Pick one of the `top_k` strongest storms of `year`.
    pub fn select_storm(&self, year: i32, top_k: usize) -> DossierResult<Event> {
        self.select_storm_with_rng(year, top_k, &mut rand::thread_rng())
    }

    pub fn select_storm_with_rng<R: Rng + ?Sized>(
        &self,
        year: i32,
        top_k: usize,
        rng: &mut R,
    ) -> DossierResult<Event> {
        let store = self.snapshot()?;
        let storm = StormSelector::new(top_k).select_with_rng(year, store.as_ref(), rng)?;
        Ok(storm.clone())
    }

    /// Classify a closure. Requires a loaded store like every other operation.
    pub fn classify(&self, closure: &LinkageClosure, root_storm: &Event) -> DossierResult<Dossier> {
        self.snapshot()?;
        Ok(classify(closure, root_storm))
    }

    /// Linked-cause frequencies over the `top_n` strongest storms of the store.
    pub fn cause_frequencies(&self, top_n: usize) -> DossierResult<CauseFrequencies> {
        let store = self.snapshot()?;
        Ok(cause_frequencies(store.as_ref(), top_n))
    }

    /// Storm counts per start year.
    pub fn storm_counts_by_year(&self) -> DossierResult<BTreeMap<i32, usize>> {
        let store = self.snapshot()?;
        Ok(storm_counts_by_year(store.as_ref()))
    }

    /// Build the dossier and storylines for an explicitly chosen root storm.
    pub fn package_for(&self, root: &EventId) -> DossierResult<StoryPackage> {
        let store = self.snapshot()?;
        let storm = store
            .get(root)
            .ok_or_else(|| DossierError::UnknownEvent(root.clone()))?;
        Ok(self.assemble(store.as_ref(), storm))
    }

    /// Select a storm for `year` and build its full story package.
    pub fn generate_package(&self, year: i32) -> DossierResult<StoryPackage> {
        self.generate_package_with_rng(year, &mut rand::thread_rng())
    }

    pub fn generate_package_with_rng<R: Rng + ?Sized>(
        &self,
        year: i32,
        rng: &mut R,
    ) -> DossierResult<StoryPackage> {
        let store = self.snapshot()?;
        let selector = StormSelector::new(self.config.selection.top_k);
        let storm = selector.select_with_rng(year, store.as_ref(), rng)?;
        Ok(self.assemble(store.as_ref(), storm))
    }

    fn assemble(&self, store: &EventStore, storm: &Event) -> StoryPackage {
        let closure = closure(&storm.id, store);
        let events = closure.records(store).into_iter().cloned().collect();
        let dossier = classify(&closure, storm);
        let renderer = NarrativeRenderer::new(self.config.narrative.clone());
        let storylines = renderer.render_all(&dossier, &closure).into_iter().collect();

        let package = StoryPackage {
            id: PackageId::new(),
            storm: StormDetails::from(storm),
            closure,
            events,
            dossier,
            storylines,
        };
        info!(
            package = %package.id,
            storm = %package.storm.id,
            events = package.closure.len(),
            "story package assembled"
        );
        package
    }
}
