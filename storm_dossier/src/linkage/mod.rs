//! Linkage graph walker.
//!
//! Events reference each other through `linked_event_ids`, forming a directed
//! graph that may contain cycles. The walker collects everything reachable
//! from a root event:
//! 1. **Seed**: the root, if it is in the store
//! 2. **Expand**: breadth-first over linked-event references, never
//!    re-enqueuing a visited id
//! 3. **Type**: each reached id is typed from its record, or from the type
//!    code embedded in the id when the record is missing
//! 4. **Order**: the result is sorted by id string

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use space_weather::{Event, EventId, EventLookup, EventType};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// One event reached by the walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureEntry {
    pub id: EventId,

    /// `None` when neither a record nor the id says what the event is.
    pub event_type: Option<EventType>,

    /// Whether the store holds a record for this id.
    pub resolved: bool,
}

impl ClosureEntry {
    fn from_record(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            event_type: Some(event.event_type),
            resolved: true,
        }
    }

    fn dangling(id: EventId) -> Self {
        let event_type = id.parse_type().ok();
        Self {
            id,
            event_type,
            resolved: false,
        }
    }

    /// Timestamp encoded in the id.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.id.timestamp()
    }
}

/// The set of events reachable from a root, sorted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageClosure {
    entries: Vec<ClosureEntry>,
}

impl LinkageClosure {
    /// Build a closure from bare identifiers, typing each one from its id.
    pub fn from_ids(ids: impl IntoIterator<Item = EventId>) -> Self {
        let unique: HashSet<EventId> = ids.into_iter().collect();
        Self::sorted(unique.into_iter().map(ClosureEntry::dangling).collect())
    }

    fn sorted(mut entries: Vec<ClosureEntry>) -> Self {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Self { entries }
    }

    pub fn entries(&self) -> &[ClosureEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &EventId> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.entries.binary_search_by(|e| e.id.cmp(id)).is_ok()
    }

    /// Entries of a type, in id order.
    pub fn of_type(&self, event_type: EventType) -> impl Iterator<Item = &ClosureEntry> {
        self.entries
            .iter()
            .filter(move |e| e.event_type == Some(event_type))
    }

    pub fn contains_type(&self, event_type: EventType) -> bool {
        self.of_type(event_type).next().is_some()
    }

    /// The first entry of a type in id order.
    pub fn first_of_type(&self, event_type: EventType) -> Option<&ClosureEntry> {
        self.of_type(event_type).next()
    }

    /// Entries whose record is not in the store.
    pub fn dangling(&self) -> impl Iterator<Item = &ClosureEntry> {
        self.entries.iter().filter(|e| !e.resolved)
    }

    /// Full records of the entries held by `store`, in id order.
    pub fn records<'a, S>(&self, store: &'a S) -> Vec<&'a Event>
    where
        S: EventLookup + ?Sized,
    {
        self.entries.iter().filter_map(|e| store.get(&e.id)).collect()
    }
}

/// Collect every event reachable from `root` through linked-event references.
///
/// Returns an empty closure when the root is not in the store. References to
/// ids missing from the store are kept as dangling entries but not expanded.
pub fn closure<S>(root: &EventId, store: &S) -> LinkageClosure
where
    S: EventLookup + ?Sized,
{
    if !store.contains(root) {
        debug!(root = %root, "root event not in store");
        return LinkageClosure::default();
    }

    let mut visited: HashSet<EventId> = HashSet::from([root.clone()]);
    let mut queue: VecDeque<EventId> = VecDeque::from([root.clone()]);
    let mut entries = Vec::new();

    while let Some(current) = queue.pop_front() {
        match store.get(&current) {
            Some(event) => {
                for linked in &event.linked_event_ids {
                    if visited.insert(linked.clone()) {
                        queue.push_back(linked.clone());
                    }
                }
                entries.push(ClosureEntry::from_record(event));
            }
            None => entries.push(ClosureEntry::dangling(current)),
        }
    }

    let closure = LinkageClosure::sorted(entries);
    debug!(
        root = %root,
        size = closure.len(),
        dangling = closure.dangling().count(),
        "linkage closure computed"
    );
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_weather::EventStore;

    const GST: &str = "2024-05-10T15:00:00-GST-001";
    const CME: &str = "2024-05-08T05:36:00-CME-001";
    const FLR: &str = "2024-05-08T04:37:00-FLR-001";
    const IPS: &str = "2024-05-10T16:36:00-IPS-001";

    fn chain_store() -> EventStore {
        vec![
            Event::from_id(GST).unwrap().with_link(CME).with_link(IPS),
            Event::from_id(CME).unwrap().with_link(FLR).with_link(GST),
            Event::from_id(FLR).unwrap(),
            Event::from_id(IPS).unwrap().with_link(CME),
        ]
        .into_iter()
        .collect()
    }

    fn id_strings(closure: &LinkageClosure) -> Vec<&str> {
        closure.ids().map(EventId::as_str).collect()
    }

    #[test]
    fn test_closure_collects_chain_sorted() {
        let store = chain_store();
        let closure = closure(&EventId::new(GST), &store);

        // the flare precedes the CME in id order
        assert_eq!(id_strings(&closure), vec![FLR, CME, GST, IPS]);
        assert!(closure.entries().iter().all(|e| e.resolved));
    }

    #[test]
    fn test_closure_of_missing_root_is_empty() {
        let store = chain_store();
        let closure = closure(&EventId::new("2020-01-01T00:00:00-GST-009"), &store);
        assert!(closure.is_empty());
    }

    #[test]
    fn test_two_cycle_terminates() {
        let a = "2024-01-01T00:00:00-CME-001";
        let b = "2024-01-02T00:00:00-GST-001";
        let store: EventStore = vec![
            Event::from_id(a).unwrap().with_link(b),
            Event::from_id(b).unwrap().with_link(a),
        ]
        .into_iter()
        .collect();

        let closure = closure(&EventId::new(a), &store);
        assert_eq!(id_strings(&closure), vec![a, b]);
    }

    #[test]
    fn test_self_link() {
        let store: EventStore = vec![Event::from_id(GST).unwrap().with_link(GST)]
            .into_iter()
            .collect();
        assert_eq!(closure(&EventId::new(GST), &store).len(), 1);
    }

    #[test]
    fn test_dangling_reference_is_kept_and_typed() {
        let missing = "2024-05-10T17:00:00-MPC-001";
        let store: EventStore = vec![Event::from_id(GST).unwrap().with_link(missing)]
            .into_iter()
            .collect();

        let closure = closure(&EventId::new(GST), &store);
        assert_eq!(closure.len(), 2);

        let dangling: Vec<_> = closure.dangling().collect();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].id.as_str(), missing);
        assert_eq!(dangling[0].event_type, Some(EventType::Mpc));
    }

    #[test]
    fn test_unparseable_dangling_reference_is_untyped() {
        let store: EventStore = vec![Event::from_id(GST).unwrap().with_link("not-an-event")]
            .into_iter()
            .collect();

        let closure = closure(&EventId::new(GST), &store);
        let entry = closure.dangling().next().unwrap();
        assert_eq!(entry.event_type, None);
    }

    #[test]
    fn test_record_type_wins_over_id() {
        // stored as a CME even though the id says otherwise
        let odd = "2024-05-09T00:00:00-XYZ-001";
        let store: EventStore = vec![
            Event::from_id(GST).unwrap().with_link(odd),
            Event::new(odd, EventType::Cme),
        ]
        .into_iter()
        .collect();

        let closure = closure(&EventId::new(GST), &store);
        assert!(closure.contains_type(EventType::Cme));
    }

    #[test]
    fn test_records_skip_dangling_ids() {
        let missing = "2024-05-10T17:00:00-MPC-001";
        let store: EventStore = vec![
            Event::from_id(GST).unwrap().with_link(CME).with_link(missing),
            Event::from_id(CME).unwrap(),
        ]
        .into_iter()
        .collect();

        let closure = closure(&EventId::new(GST), &store);
        let records: Vec<_> = closure
            .records(&store)
            .into_iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(closure.len(), 3);
        assert_eq!(records, vec![CME, GST]);
    }

    #[test]
    fn test_from_ids_dedups_and_sorts() {
        let closure = LinkageClosure::from_ids(vec![
            EventId::new(IPS),
            EventId::new(CME),
            EventId::new(IPS),
        ]);
        assert_eq!(id_strings(&closure), vec![CME, IPS]);
        assert!(closure.contains(&EventId::new(CME)));
        assert_eq!(
            closure.first_of_type(EventType::Ips).map(|e| e.id.as_str()),
            Some(IPS)
        );
    }
}
