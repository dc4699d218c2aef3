use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::models::FavoriteRecipe;
use crate::storage::{FAVORITES_KEY, Storage};

type Listener = Box<dyn Fn(&[FavoriteRecipe]) + Send + Sync>;

/// The set of recipes the user has marked as favorite.
///
/// Hydrated from the `recipeFavorites` slot once at construction and flushed
/// back after every effective mutation. The in-memory collection stays the
/// source of truth for the session even when a flush fails. At most one entry
/// per recipe id.
pub struct FavoritesStore {
    recipes: Vec<FavoriteRecipe>,
    storage: Arc<dyn Storage>,
    listeners: Vec<Listener>,
}

impl FavoritesStore {
    /// Create the store, hydrating from storage. Malformed or unreadable data
    /// is treated as an empty collection, not an error.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let recipes = hydrate(storage.as_ref());
        Self {
            recipes,
            storage,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn recipes(&self) -> &[FavoriteRecipe] {
        &self.recipes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    #[must_use]
    pub fn is_favorite(&self, id: i64) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    /// Insert `recipe` with its favorite flag set, unless an entry with the
    /// same id already exists. Returns whether the collection changed.
    pub fn add(&mut self, mut recipe: FavoriteRecipe) -> bool {
        if self.is_favorite(recipe.id) {
            return false;
        }
        recipe.is_favorite = true;
        self.recipes.push(recipe);
        self.committed();
        true
    }

    /// Delete any entry matching `id`; no-op if absent.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        let changed = self.recipes.len() != before;
        if changed {
            self.committed();
        }
        changed
    }

    /// Remove the recipe if it is already a favorite, add it otherwise.
    /// Returns true when the recipe is a favorite after the call.
    pub fn toggle(&mut self, recipe: FavoriteRecipe) -> bool {
        if self.is_favorite(recipe.id) {
            self.remove(recipe.id);
            false
        } else {
            self.add(recipe);
            true
        }
    }

    /// Register a listener fired synchronously after each effective mutation,
    /// once the post-mutation state has been flushed to storage.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&[FavoriteRecipe]) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn committed(&self) {
        if let Err(e) = self.persist() {
            warn!("failed to persist favorites: {e:#}");
        }
        for listener in &self.listeners {
            listener(&self.recipes);
        }
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.recipes)?;
        self.storage.write(FAVORITES_KEY, &json)
    }
}

fn hydrate(storage: &dyn Storage) -> Vec<FavoriteRecipe> {
    let raw = match storage.read(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to read favorites slot: {e:#}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(recipes) => recipes,
        Err(e) => {
            warn!("malformed favorites data, starting empty: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryStorage;

    fn recipe(id: i64, title: &str) -> FavoriteRecipe {
        FavoriteRecipe {
            id,
            title: title.to_string(),
            summary: "Italian".to_string(),
            image: format!("https://example.com/{id}.png"),
            cooking_time_minutes: 45,
            difficulty: "Easy".to_string(),
            is_favorite: false,
        }
    }

    fn fresh_store() -> FavoritesStore {
        FavoritesStore::load(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_add_sets_favorite_flag() {
        let mut store = fresh_store();
        assert!(store.add(recipe(1, "Margherita Pizza")));
        assert!(store.recipes()[0].is_favorite);
        assert!(store.is_favorite(1));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = fresh_store();
        assert!(store.add(recipe(1, "Margherita Pizza")));
        assert!(!store.add(recipe(1, "Margherita Pizza")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = fresh_store();
        store.add(recipe(1, "Margherita Pizza"));
        assert!(!store.remove(99));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_symmetry() {
        let mut store = fresh_store();
        store.add(recipe(1, "Margherita Pizza"));
        let before: Vec<i64> = store.recipes().iter().map(|r| r.id).collect();

        assert!(store.toggle(recipe(2, "Pad Thai")));
        assert!(!store.toggle(recipe(2, "Pad Thai")));

        let after: Vec<i64> = store.recipes().iter().map(|r| r.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_persistence_round_trip() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut store = FavoritesStore::load(storage.clone());
            store.add(recipe(1, "Margherita Pizza"));
            store.add(recipe(2, "Pad Thai"));
        }

        // Simulated reload: hydrate a new store from the same slots.
        let store = FavoritesStore::load(storage);
        assert_eq!(store.len(), 2);
        assert!(store.is_favorite(1));
        assert!(store.is_favorite(2));
        assert_eq!(store.recipes()[1].title, "Pad Thai");
        assert_eq!(store.recipes()[0].cooking_time_minutes, 45);
    }

    #[test]
    fn test_malformed_storage_yields_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(FAVORITES_KEY, "not json {{{").unwrap();

        let store = FavoritesStore::load(storage);
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

        store.add(recipe(1, "Margherita Pizza"));
        store.add(recipe(1, "Margherita Pizza")); // duplicate, no-op
        store.remove(99); // absent, no-op
        store.remove(1);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_sees_post_mutation_state() {
        let mut store = fresh_store();
        let observed = Arc::new(AtomicUsize::new(usize::MAX));
        let slot = observed.clone();
        store.subscribe(move |recipes| {
            slot.store(recipes.len(), Ordering::SeqCst);
        });

        store.add(recipe(1, "Margherita Pizza"));
        assert_eq!(observed.load(Ordering::SeqCst), 1);
        store.remove(1);
        assert_eq!(observed.load(Ordering::SeqCst), 0);
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
        let mut store = FavoritesStore::load(Arc::new(FailingStorage));
        assert!(store.add(recipe(1, "Margherita Pizza")));
        assert!(store.is_favorite(1));
        assert_eq!(store.len(), 1);
    }
}
