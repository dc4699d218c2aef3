use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::models::{MANUAL_ENTRY, ShoppingItem};
use crate::storage::{SHOPPING_LIST_KEY, Storage};

type Listener = Box<dyn Fn(&[ShoppingItem]) + Send + Sync>;

/// Shopping items accumulated from recipes and manual entry.
///
/// Invariant: among unchecked items no two share the same name
/// (case-insensitive). Checked items are exempt, so an ingredient already
/// bought does not block re-adding it for the next shopping run.
///
/// Same persistence contract as the favorites store: hydrated once from the
/// `recipeShoppingList` slot, flushed after every effective mutation, and the
/// in-memory list remains authoritative when a flush fails.
pub struct ShoppingListStore {
    items: Vec<ShoppingItem>,
    storage: Arc<dyn Storage>,
    listeners: Vec<Listener>,
}

impl ShoppingListStore {
    /// Create the store, hydrating from storage. Malformed or unreadable data
    /// is treated as an empty list, not an error.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let items = hydrate(storage.as_ref());
        Self {
            items,
            storage,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items still to buy.
    #[must_use]
    pub fn unchecked_count(&self) -> usize {
        self.items.iter().filter(|i| !i.checked).count()
    }

    /// Add one item per ingredient name, tagged with the recipe it came from.
    ///
    /// A name that already has an unchecked entry is skipped without touching
    /// the existing item's provenance. Each name is checked against the list
    /// as it grows, so a single batch cannot introduce internal duplicates.
    /// Returns the number of items inserted.
    pub fn add_many<I, S>(&mut self, ingredients: I, recipe_name: &str) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inserted = 0;
        for name in ingredients {
            let name = name.as_ref();
            if self.has_unchecked(name) {
                continue;
            }
            self.items.push(ShoppingItem::new(name, recipe_name));
            inserted += 1;
        }
        if inserted > 0 {
            self.committed();
        }
        inserted
    }

    /// Add a hand-entered item with the manual-entry provenance label.
    ///
    /// Whitespace is trimmed first; empty names and unchecked duplicates are
    /// no-ops. Returns whether an item was inserted.
    pub fn add_single(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.has_unchecked(name) {
            return false;
        }
        self.items.push(ShoppingItem::new(name, MANUAL_ENTRY));
        self.committed();
        true
    }

    /// Delete the item with that id; no-op if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        let changed = self.items.len() != before;
        if changed {
            self.committed();
        }
        changed
    }

    /// Flip the checked flag on the matching item; no-op if absent.
    pub fn toggle_checked(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        item.checked = !item.checked;
        self.committed();
        true
    }

    /// Remove every checked item, returning how many were dropped.
    pub fn clear_checked(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !i.checked);
        let removed = before - self.items.len();
        if removed > 0 {
            self.committed();
        }
        removed
    }

    /// Empty the entire list.
    pub fn clear_all(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.committed();
    }

    /// Register a listener fired synchronously after each effective mutation,
    /// once the post-mutation state has been flushed to storage.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&[ShoppingItem]) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn has_unchecked(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.items
            .iter()
            .any(|i| !i.checked && i.name.to_lowercase() == lower)
    }

    fn committed(&self) {
        if let Err(e) = self.persist() {
            warn!("failed to persist shopping list: {e:#}");
        }
        for listener in &self.listeners {
            listener(&self.items);
        }
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.write(SHOPPING_LIST_KEY, &json)
    }
}

fn hydrate(storage: &dyn Storage) -> Vec<ShoppingItem> {
    let raw = match storage.read(SHOPPING_LIST_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to read shopping list slot: {e:#}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!("malformed shopping list data, starting empty: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryStorage;

    fn fresh_store() -> ShoppingListStore {
        ShoppingListStore::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_many_tags_provenance() {
        let mut store = fresh_store();
        let added = store.add_many(["spaghetti", "pancetta", "eggs"], "Carbonara");
        assert_eq!(added, 3);
        assert!(store.items().iter().all(|i| i.recipe == "Carbonara"));
        assert!(store.items().iter().all(|i| !i.checked));
    }

    #[test]
    fn test_batch_dedup_is_case_insensitive() {
        let mut store = fresh_store();
        let added = store.add_many(["egg", "egg", "Egg"], "Omelette");
        assert_eq!(added, 1);
        assert_eq!(store.len(), 1);
        // First-seen spelling wins.
        assert_eq!(store.items()[0].name, "egg");
    }

    #[test]
    fn test_dedup_against_existing_unchecked() {
        let mut store = fresh_store();
        store.add_many(["milk", "butter"], "Pancakes");
        let added = store.add_many(["Milk", "flour"], "Crepes");
        assert_eq!(added, 1);
        assert_eq!(store.len(), 3);
        // The skipped duplicate keeps its original provenance.
        let milk = store.items().iter().find(|i| i.name == "milk").unwrap();
        assert_eq!(milk.recipe, "Pancakes");
    }

    #[test]
    fn test_checked_items_bypass_dedup() {
        let mut store = fresh_store();
        store.add_single("milk");
        let id = store.items()[0].id.clone();
        store.toggle_checked(&id);

        assert!(store.add_single("milk"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.unchecked_count(), 1);
    }

    #[test]
    fn test_add_single_trims_and_rejects_empty() {
        let mut store = fresh_store();
        assert!(!store.add_single("   "));
        assert!(store.add_single("  flour  "));
        assert_eq!(store.items()[0].name, "flour");
        // Trimmed duplicate of an unchecked item is a no-op.
        assert!(!store.add_single("FLOUR "));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_manual_item_sentinel() {
        let mut store = fresh_store();
        store.add_single("flour");
        assert_eq!(store.items()[0].recipe, MANUAL_ENTRY);
    }

    #[test]
    fn test_remove_and_toggle_absent_are_noops() {
        let mut store = fresh_store();
        store.add_single("flour");
        assert!(!store.remove("zzzzzzzzz"));
        assert!(!store.toggle_checked("zzzzzzzzz"));
        assert_eq!(store.len(), 1);
        assert!(!store.items()[0].checked);
    }

    #[test]
    fn test_toggle_checked_flips_both_ways() {
        let mut store = fresh_store();
        store.add_single("milk");
        let id = store.items()[0].id.clone();

        assert!(store.toggle_checked(&id));
        assert!(store.items()[0].checked);
        assert!(store.toggle_checked(&id));
        assert!(!store.items()[0].checked);
    }

    #[test]
    fn test_clear_checked_partitions() {
        let mut store = fresh_store();
        store.add_many(["milk", "eggs", "flour", "sugar"], "Cake");
        let checked_ids: Vec<String> = store.items()[..2].iter().map(|i| i.id.clone()).collect();
        for id in &checked_ids {
            store.toggle_checked(id);
        }

        let removed = store.clear_checked();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 2);
        assert!(store.items().iter().all(|i| !i.checked));
    }

    #[test]
    fn test_clear_all_empties_list() {
        let mut store = fresh_store();
        store.add_many(["milk", "eggs"], "Cake");
        store.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let storage = Arc::new(MemoryStorage::new());
        let checked_id;
        {
            let mut store = ShoppingListStore::load(storage.clone());
            store.add_many(["milk", "eggs"], "Cake");
            checked_id = store.items()[0].id.clone();
            store.toggle_checked(&checked_id);
        }

        let store = ShoppingListStore::load(storage);
        assert_eq!(store.len(), 2);
        let milk = store.items().iter().find(|i| i.id == checked_id).unwrap();
        assert!(milk.checked);
        assert_eq!(milk.name, "milk");
        assert_eq!(milk.recipe, "Cake");
    }

    #[test]
    fn test_malformed_storage_yields_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(SHOPPING_LIST_KEY, "[{\"id\":42}]").unwrap();

        let store = ShoppingListStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_listeners_fire_on_effective_mutations_only() {
        let mut store = fresh_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.add_many(["egg", "Egg"], "Omelette"); // one insert, one notify
        store.add_single("egg"); // duplicate, no-op
        store.add_single(""); // empty, no-op
        store.clear_checked(); // nothing checked, no-op
        store.clear_all();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("quota exceeded")
        }
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = ShoppingListStore::load(Arc::new(FailingStorage));
        assert!(store.add_single("flour"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.unchecked_count(), 1);
    }
}
