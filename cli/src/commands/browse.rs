use anyhow::Result;
use std::process;

use crate::dummyjson::DummyJsonClient;
use ladle_core::dummyjson::{RecipeData, RecipeFilters};
use ladle_core::favorites::FavoritesStore;

use super::helpers::print_recipe_table;

pub(crate) async fn cmd_browse(
    api: &DummyJsonClient,
    favorites: &FavoritesStore,
    cuisine: Option<&str>,
    filters: &RecipeFilters,
    json: bool,
) -> Result<()> {
    let recipes = match cuisine {
        Some(cuisine) => api.by_cuisine_async(cuisine).await?,
        None => api.list_async().await?,
    };
    let filtered: Vec<RecipeData> = recipes.into_iter().filter(|r| filters.matches(r)).collect();

    if filtered.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
    } else {
        let refs: Vec<&RecipeData> = filtered.iter().collect();
        print_recipe_table(&refs, favorites);
    }

    Ok(())
}

pub(crate) async fn cmd_search(
    api: &DummyJsonClient,
    favorites: &FavoritesStore,
    query: &str,
    json: bool,
) -> Result<()> {
    let recipes = api.search_async(query).await?;

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found for '{query}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        let count = recipes.len();
        println!("Found {count} recipe{}", if count == 1 { "" } else { "s" });
        let refs: Vec<&RecipeData> = recipes.iter().collect();
        print_recipe_table(&refs, favorites);
    }

    Ok(())
}

pub(crate) async fn cmd_show(
    api: &DummyJsonClient,
    favorites: &FavoritesStore,
    id: i64,
    json: bool,
) -> Result<()> {
    let recipe = api.get_async(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    let name = &recipe.name;
    let marker = if favorites.is_favorite(recipe.id) {
        " ♥"
    } else {
        ""
    };
    println!("{name}{marker} (id: {id})");
    println!(
        "{} | {} | ⭐ {:.1} ({} reviews)",
        recipe.cuisine, recipe.difficulty, recipe.rating, recipe.review_count
    );
    println!(
        "Prep {} min | Cook {} min | Serves {} | {} kcal/serving",
        recipe.prep_time_minutes, recipe.cook_time_minutes, recipe.servings,
        recipe.calories_per_serving
    );
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {ingredient}");
    }

    println!("\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }

    Ok(())
}
