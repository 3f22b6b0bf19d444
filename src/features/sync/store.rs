use std::collections::HashSet;

/// Items that carry a stable merge key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Ordered list of view-models owned by a single screen.
///
/// Holds at most one item per key. Order is whatever callers supply; the store
/// never sorts. There is no locking: only the owning screen's actor touches it.
/// Loading state is not modelled here.
#[derive(Debug, Clone)]
pub struct ReconciliationStore<T> {
    items: Vec<T>,
}

impl<T> Default for ReconciliationStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> ReconciliationStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the authoritative list. Anything not in `items` disappears.
    ///
    /// If the source list repeats a key, the first occurrence is kept.
    pub fn replace_all(&mut self, items: Vec<T>) {
        let mut seen = HashSet::with_capacity(items.len());
        self.items = items
            .into_iter()
            .filter(|item| seen.insert(item.key().to_string()))
            .collect();
    }

    /// Replace in place if the key exists, otherwise insert at the front.
    pub fn upsert(&mut self, item: T) {
        match self.position(item.key()) {
            Some(idx) => self.items[idx] = item,
            None => self.items.insert(0, item),
        }
    }

    /// Drop the item with `key`; no-op if absent.
    pub fn remove(&mut self, key: &str) {
        if let Some(idx) = self.position(key) {
            self.items.remove(idx);
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.position(key).map(|idx| &self.items[idx])
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tickets::models::TicketViewModel;
    use crate::shared::test_helpers::fake_ticket;

    fn ids(store: &ReconciliationStore<TicketViewModel>) -> Vec<&str> {
        store.items().iter().map(|t| t.ticket_id.as_str()).collect()
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut store = ReconciliationStore::new();
        let t = fake_ticket("TCK-1");

        store.upsert(t.clone());
        store.upsert(t.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("TCK-1"), Some(&t));
    }

    #[test]
    fn test_upsert_new_goes_first() {
        let mut store = ReconciliationStore::new();
        store.replace_all(vec![fake_ticket("A"), fake_ticket("B")]);
        store.upsert(fake_ticket("C"));
        assert_eq!(ids(&store), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_upsert_existing_keeps_position() {
        let mut store = ReconciliationStore::new();
        store.replace_all(vec![fake_ticket("A"), fake_ticket("B"), fake_ticket("C")]);

        let updated = TicketViewModel::new("B").with_raw_status("completed");
        store.upsert(updated.clone());

        assert_eq!(ids(&store), vec!["A", "B", "C"]);
        assert_eq!(store.get("B"), Some(&updated));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = ReconciliationStore::new();
        store.upsert(fake_ticket("A"));
        store.remove("ZZZ");
        assert_eq!(ids(&store), vec!["A"]);
        store.remove("A");
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_empty_leaves_no_residue() {
        let mut store = ReconciliationStore::new();
        for i in 0..5 {
            store.upsert(fake_ticket(&format!("TCK-{}", i)));
        }
        assert_eq!(store.len(), 5);

        store.replace_all(Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_preserves_caller_order_and_dedupes() {
        let mut store = ReconciliationStore::new();
        store.upsert(fake_ticket("OLD"));

        let first = TicketViewModel::new("B").with_raw_status("open");
        store.replace_all(vec![
            first.clone(),
            fake_ticket("A"),
            TicketViewModel::new("B").with_raw_status("completed"),
        ]);

        assert_eq!(ids(&store), vec!["B", "A"]);
        assert_eq!(store.get("B"), Some(&first));
    }
}
