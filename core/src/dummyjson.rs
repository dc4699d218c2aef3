use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::models::FavoriteRecipe;

/// One recipe record as returned by the `DummyJSON` recipes API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeData {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub calories_per_serving: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecipeListResponse {
    #[serde(default)]
    pub recipes: Vec<RecipeData>,
    #[serde(default)]
    pub total: u32,
}

impl RecipeData {
    /// Prep plus cook time, the figure shown on recipe cards.
    #[must_use]
    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes + self.cook_time_minutes
    }
}

/// Narrow a full recipe record to the favorite snapshot stored locally.
///
/// The API has no prose summary field, so the snapshot's summary is built
/// from the cuisine and tag list.
#[must_use]
pub fn recipe_to_favorite(recipe: &RecipeData) -> FavoriteRecipe {
    let summary = if recipe.tags.is_empty() {
        recipe.cuisine.clone()
    } else {
        format!("{} ({})", recipe.cuisine, recipe.tags.join(", "))
    };
    FavoriteRecipe {
        id: recipe.id,
        title: recipe.name.clone(),
        summary,
        image: recipe.image.clone(),
        cooking_time_minutes: recipe.total_time_minutes(),
        difficulty: recipe.difficulty.clone(),
        is_favorite: true,
    }
}

/// Total-time bands used by the browse filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Quick,
    Medium,
    Long,
}

impl TimeBand {
    #[must_use]
    pub fn contains(self, minutes: u32) -> bool {
        match self {
            Self::Quick => minutes <= 30,
            Self::Medium => minutes > 30 && minutes <= 60,
            Self::Long => minutes > 60,
        }
    }
}

pub fn parse_time_band(s: &str) -> Result<TimeBand> {
    match s.to_lowercase().as_str() {
        "quick" => Ok(TimeBand::Quick),
        "medium" => Ok(TimeBand::Medium),
        "long" => Ok(TimeBand::Long),
        _ => bail!("Invalid time filter '{s}'. Must be one of: quick, medium, long"),
    }
}

/// Client-side filters applied after fetching, mirroring the browse page.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilters {
    pub time: Option<TimeBand>,
    pub difficulty: Option<String>,
    pub min_rating: Option<f64>,
    pub tag: Option<String>,
}

impl RecipeFilters {
    #[must_use]
    pub fn matches(&self, recipe: &RecipeData) -> bool {
        if let Some(band) = self.time {
            if !band.contains(recipe.total_time_minutes()) {
                return false;
            }
        }
        if let Some(difficulty) = &self.difficulty {
            if !recipe.difficulty.eq_ignore_ascii_case(difficulty) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if recipe.rating < min {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            let tag = tag.to_lowercase();
            if !recipe.tags.iter().any(|t| t.to_lowercase().contains(&tag)) {
                return false;
            }
        }
        true
    }
}
