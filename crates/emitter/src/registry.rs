use crate::event::EventKey;
use crate::listener::Listener;
use indexmap::IndexMap;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListenerRecord {
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    Added,
    Updated,
}

/// Ordered event -> listener bookkeeping.
///
/// An event is present only while it has at least one listener. Listener
/// order is insertion order; updating a record keeps its position.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    events: IndexMap<EventKey, IndexMap<Listener, ListenerRecord>>,
}

impl Registry {
    pub fn insert(&mut self, event: EventKey, listener: Listener, once: bool) -> Insertion {
        let listeners = self.events.entry(event).or_default();
        match listeners.insert(listener, ListenerRecord { once }) {
            Some(_) => Insertion::Updated,
            None => Insertion::Added,
        }
    }

    /// Remove one listener, collapsing the event once it is empty.
    ///
    /// The removed handle is returned so the caller decides where it gets
    /// dropped.
    pub fn remove_listener(&mut self, event: &EventKey, listener: &Listener) -> Option<Listener> {
        let listeners = self.events.get_mut(event)?;
        let (removed, _) = listeners.shift_remove_entry(listener)?;
        if listeners.is_empty() {
            self.events.shift_remove(event);
        }
        Some(removed)
    }

    pub fn remove_event(&mut self, event: &EventKey) -> Vec<Listener> {
        self.events
            .shift_remove(event)
            .map(|listeners| listeners.into_keys().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) -> Vec<Listener> {
        std::mem::take(&mut self.events)
            .into_values()
            .flat_map(|listeners| listeners.into_keys())
            .collect()
    }

    pub fn record(&self, event: &EventKey, listener: &Listener) -> Option<ListenerRecord> {
        self.events
            .get(event)
            .and_then(|listeners| listeners.get(listener))
            .copied()
    }

    pub fn events(&self) -> HashSet<EventKey> {
        self.events.keys().cloned().collect()
    }

    pub fn listeners(&self, event: &EventKey) -> Vec<Listener> {
        self.events
            .get(event)
            .map(|listeners| listeners.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, event: &EventKey) -> usize {
        self.events.get(event).map_or(0, IndexMap::len)
    }

    pub fn contains(&self, event: &EventKey) -> bool {
        self.events.contains_key(event)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn summary(&self) -> Vec<(EventKey, usize)> {
        self.events
            .iter()
            .map(|(event, listeners)| (event.clone(), listeners.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener() -> Listener {
        Listener::infallible(|_| {})
    }

    #[test]
    fn test_insert_creates_event() {
        let mut registry = Registry::default();
        let f = listener();

        assert_eq!(registry.insert("e".into(), f.clone(), false), Insertion::Added);
        assert!(registry.contains(&"e".into()));
        assert_eq!(registry.listeners(&"e".into()), vec![f]);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut registry = Registry::default();
        let (a, b, c) = (listener(), listener(), listener());
        let event = EventKey::from("e");

        registry.insert(event.clone(), a.clone(), true);
        registry.insert(event.clone(), b.clone(), false);
        registry.insert(event.clone(), c.clone(), false);

        assert_eq!(registry.insert(event.clone(), a.clone(), false), Insertion::Updated);
        assert_eq!(registry.listeners(&event), vec![a.clone(), b, c]);
        assert_eq!(registry.record(&event, &a), Some(ListenerRecord { once: false }));
        assert_eq!(registry.listener_count(&event), 3);
    }

    #[test]
    fn test_remove_last_listener_drops_event() {
        let mut registry = Registry::default();
        let (f, g) = (listener(), listener());
        let event = EventKey::from("e");

        registry.insert(event.clone(), f.clone(), false);
        registry.insert(event.clone(), g.clone(), false);

        assert_eq!(registry.remove_listener(&event, &f), Some(f.clone()));
        assert_eq!(registry.listeners(&event), vec![g.clone()]);
        assert_eq!(registry.remove_listener(&event, &g), Some(g.clone()));
        assert!(!registry.contains(&event));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut registry = Registry::default();
        let f = listener();

        assert_eq!(registry.remove_listener(&"e".into(), &f), None);
        assert!(registry.remove_event(&"e".into()).is_empty());

        registry.insert("e".into(), f, false);
        assert_eq!(registry.remove_listener(&"e".into(), &listener()), None);
        assert_eq!(registry.listener_count(&"e".into()), 1);
    }

    #[test]
    fn test_remove_event_and_clear() {
        let mut registry = Registry::default();
        let (a1, a2, b) = (listener(), listener(), listener());
        registry.insert("a".into(), a1.clone(), false);
        registry.insert("a".into(), a2.clone(), false);
        registry.insert("b".into(), b.clone(), false);

        assert_eq!(registry.remove_event(&"a".into()), vec![a1, a2]);
        assert_eq!(registry.events(), HashSet::from([EventKey::from("b")]));
        assert_eq!(registry.clear(), vec![b]);
        assert!(registry.events().is_empty());
    }

    #[test]
    fn test_summary_in_insertion_order() {
        let mut registry = Registry::default();
        registry.insert(true.into(), listener(), false);
        registry.insert("x".into(), listener(), false);
        registry.insert("x".into(), listener(), true);

        assert_eq!(
            registry.summary(),
            vec![(EventKey::from(true), 1), (EventKey::from("x"), 2)]
        );
    }
}
