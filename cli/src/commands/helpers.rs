use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use ladle_core::dummyjson::RecipeData;
use ladle_core::favorites::FavoritesStore;
use ladle_core::models::{FavoriteRecipe, ShoppingItem};

/// Sort orders for the shopping list display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortBy {
    Added,
    Name,
    Recipe,
}

pub(crate) fn parse_sort(s: &str) -> Result<SortBy> {
    match s.to_lowercase().as_str() {
        "added" => Ok(SortBy::Added),
        "name" => Ok(SortBy::Name),
        "recipe" => Ok(SortBy::Recipe),
        _ => bail!("Invalid sort '{s}'. Must be one of: added, name, recipe"),
    }
}

/// Sorted references into `items`, insertion time being the default order.
pub(crate) fn sorted_refs<'a>(items: &'a [ShoppingItem], sort: SortBy) -> Vec<&'a ShoppingItem> {
    let mut refs: Vec<&ShoppingItem> = items.iter().collect();
    match sort {
        SortBy::Added => refs.sort_by_key(|i| i.added_at),
        SortBy::Name => refs.sort_by_key(|i| i.name.to_lowercase()),
        SortBy::Recipe => refs.sort_by_key(|i| i.recipe.to_lowercase()),
    }
    refs
}

/// One exported line per item: checked marker, name, provenance suffix.
pub(crate) fn format_item_line(item: &ShoppingItem) -> String {
    let marker = if item.checked { "✅" } else { "◻️" };
    if item.recipe.is_empty() {
        format!("{marker} {}", item.name)
    } else {
        format!("{marker} {} (from: {})", item.name, item.recipe)
    }
}

/// Plain-text rendering of the whole list, ready to save or share.
pub(crate) fn export_text(items: &[&ShoppingItem], to_buy: usize) -> String {
    let lines: Vec<String> = items.iter().map(|i| format_item_line(i)).collect();
    format!("{}\n\nTotal: {to_buy} items to buy", lines.join("\n"))
}

pub(crate) fn print_recipe_table(recipes: &[&RecipeData], favorites: &FavoritesStore) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Cuisine")]
        cuisine: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Difficulty")]
        difficulty: String,
        #[tabled(rename = "Rating")]
        rating: String,
        #[tabled(rename = "Fav")]
        fav: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id,
            name: truncate(&r.name, 35),
            cuisine: r.cuisine.clone(),
            time: format!("{} min", r.total_time_minutes()),
            difficulty: r.difficulty.clone(),
            rating: format!("{:.1}", r.rating),
            fav: if favorites.is_favorite(r.id) {
                "♥".to_string()
            } else {
                String::new()
            },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_favorites_table(favorites: &[FavoriteRecipe]) {
    #[derive(Tabled)]
    struct FavoriteRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Summary")]
        summary: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Difficulty")]
        difficulty: String,
    }

    let rows: Vec<FavoriteRow> = favorites
        .iter()
        .map(|f| FavoriteRow {
            id: f.id,
            title: truncate(&f.title, 35),
            summary: truncate(&f.summary, 40),
            time: format!("{} min", f.cooking_time_minutes),
            difficulty: f.difficulty.clone(),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
}

pub(crate) fn print_shopping_table(items: &[&ShoppingItem]) {
    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = " ")]
        marker: String,
        #[tabled(rename = "Item")]
        name: String,
        #[tabled(rename = "From")]
        recipe: String,
        #[tabled(rename = "Added")]
        added: String,
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|i| ItemRow {
            id: i.id.clone(),
            marker: if i.checked { "x".to_string() } else { String::new() },
            name: truncate(&i.name, 35),
            recipe: truncate(&i.recipe, 25),
            added: i.added_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
