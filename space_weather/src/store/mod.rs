//! The in-memory event store.
//!
//! The store is filled once (usually by [`load_cache_dir`]) and is read-only
//! for everything downstream. Lookups go through the [`EventLookup`] trait so
//! that traversal and selection do not depend on how events are held.

mod loader;

pub use loader::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::events::{Category, Event, EventId, EventType};

/// Read access to a set of events.
pub trait EventLookup {
    /// Look up an event by id.
    fn get(&self, id: &EventId) -> Option<&Event>;

    /// All events of a type, in enumeration order.
    fn all_of_type(&self, event_type: EventType) -> Vec<&Event>;

    /// All events of a category: types alphabetically, each in enumeration order.
    fn all_of_category(&self, category: Category) -> Vec<&Event> {
        EventType::in_category(category)
            .flat_map(|t| self.all_of_type(t))
            .collect()
    }

    fn contains(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }
}

/// All known events, keyed by id.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventStore {
    events: HashMap<EventId, Event>,

    /// Index: type -> ids in insertion order.
    by_type: HashMap<EventType, Vec<EventId>>,
}

impl EventStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, returning the record it replaced.
    ///
    /// A replaced record keeps its enumeration position. If the replacement
    /// has a different type, it moves to the end of its new type's list.
    pub fn insert(&mut self, event: Event) -> Option<Event> {
        let id = event.id.clone();
        let event_type = event.event_type;

        let previous = self.events.insert(id.clone(), event);

        match &previous {
            Some(old) if old.event_type == event_type => {}
            Some(old) => {
                if let Some(ids) = self.by_type.get_mut(&old.event_type) {
                    ids.retain(|existing| existing != &id);
                }
                self.by_type.entry(event_type).or_default().push(id);
            }
            None => self.by_type.entry(event_type).or_default().push(id),
        }

        previous
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.events.contains_key(id)
    }

    pub fn all_of_type(&self, event_type: EventType) -> Vec<&Event> {
        self.by_type
            .get(&event_type)
            .map(|ids| ids.iter().filter_map(|id| self.events.get(id)).collect())
            .unwrap_or_default()
    }

    /// All storm (GST) events in enumeration order.
    pub fn storms(&self) -> Vec<&Event> {
        self.all_of_type(EventType::Gst)
    }

    pub fn count_of_type(&self, event_type: EventType) -> usize {
        self.by_type.get(&event_type).map_or(0, Vec::len)
    }

    /// Iterate over all events in no particular order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventLookup for EventStore {
    fn get(&self, id: &EventId) -> Option<&Event> {
        EventStore::get(self, id)
    }

    fn all_of_type(&self, event_type: EventType) -> Vec<&Event> {
        EventStore::all_of_type(self, event_type)
    }

    fn contains(&self, id: &EventId) -> bool {
        EventStore::contains(self, id)
    }
}

impl FromIterator<Event> for EventStore {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut store = EventStore::new();
        for event in iter {
            store.insert(event);
        }
        store
    }
}
