use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};

/// Slot key for the favorites collection.
pub const FAVORITES_KEY: &str = "recipeFavorites";
/// Slot key for the shopping list.
pub const SHOPPING_LIST_KEY: &str = "recipeShoppingList";

/// Keyed string-valued slots, each holding one JSON-serialized collection.
///
/// A store reads its slot once when it hydrates and writes it back after every
/// mutation. There is no versioning scheme; a schema change means resetting the
/// slot.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per slot under the app data directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(value))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key);
        std::fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// In-memory slots for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| anyhow!("storage mutex poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| anyhow!("storage mutex poisoned"))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
