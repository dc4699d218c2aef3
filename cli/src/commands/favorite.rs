use anyhow::{Result, bail};
use std::process;

use crate::dummyjson::DummyJsonClient;
use ladle_core::dummyjson::recipe_to_favorite;
use ladle_core::favorites::FavoritesStore;

use super::helpers::print_favorites_table;

pub(crate) async fn cmd_favorite_add(
    api: &DummyJsonClient,
    favorites: &mut FavoritesStore,
    id: i64,
    json: bool,
) -> Result<()> {
    let recipe = api.get_async(id).await?;
    let snapshot = recipe_to_favorite(&recipe);
    let title = snapshot.title.clone();
    let added = favorites.add(snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(favorites.recipes())?);
    } else if added {
        println!("Added '{title}' to favorites");
    } else {
        println!("'{title}' is already a favorite");
    }

    Ok(())
}

pub(crate) async fn cmd_favorite_toggle(
    api: &DummyJsonClient,
    favorites: &mut FavoritesStore,
    id: i64,
    json: bool,
) -> Result<()> {
    let recipe = api.get_async(id).await?;
    let snapshot = recipe_to_favorite(&recipe);
    let title = snapshot.title.clone();
    let now_favorite = favorites.toggle(snapshot);

    if json {
        println!("{}", serde_json::to_string_pretty(favorites.recipes())?);
    } else if now_favorite {
        println!("Added '{title}' to favorites");
    } else {
        println!("Removed '{title}' from favorites");
    }

    Ok(())
}

pub(crate) fn cmd_favorite_remove(favorites: &mut FavoritesStore, id: i64, json: bool) -> Result<()> {
    if !favorites.remove(id) {
        bail!("No favorite with id {id}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(favorites.recipes())?);
    } else {
        println!("Removed favorite {id}");
    }

    Ok(())
}

pub(crate) fn cmd_favorite_list(favorites: &FavoritesStore, json: bool) -> Result<()> {
    if favorites.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No favorites yet");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(favorites.recipes())?);
    } else {
        print_favorites_table(favorites.recipes());
    }

    Ok(())
}
