use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance label for shopping items added by hand rather than from a recipe.
pub const MANUAL_ENTRY: &str = "Manual addition";

/// Length of locally generated shopping item ids.
const ITEM_ID_LEN: usize = 9;

/// Snapshot of a recipe taken at the moment it was favorited.
///
/// Display fields are denormalized here and never re-fetched; field names are
/// camelCase on the wire to match the persisted-slot JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecipe {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub image: String,
    pub cooking_time_minutes: u32,
    pub difficulty: String,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    pub checked: bool,
    /// Name of the recipe this item came from, or [`MANUAL_ENTRY`].
    pub recipe: String,
    pub added_at: DateTime<Utc>,
}

impl ShoppingItem {
    /// Build a fresh unchecked item with a new id, stamped now.
    #[must_use]
    pub fn new(name: &str, recipe: &str) -> Self {
        Self {
            id: new_item_id(),
            name: name.to_string(),
            checked: false,
            recipe: recipe.to_string(),
            added_at: Utc::now(),
        }
    }
}

/// Random base-36 id for shopping items.
///
/// Collision-resistant at expected list sizes; collisions are not detected.
#[must_use]
pub fn new_item_id() -> String {
    use rand::Rng;

    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    (0..ITEM_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
