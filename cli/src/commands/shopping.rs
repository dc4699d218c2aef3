use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process;

use crate::dummyjson::DummyJsonClient;
use ladle_core::models::ShoppingItem;
use ladle_core::shopping::ShoppingListStore;

use super::helpers::{SortBy, export_text, print_shopping_table, sorted_refs};

pub(crate) fn cmd_shopping_add(store: &mut ShoppingListStore, name: &str, json: bool) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Item name must not be empty");
    }

    let added = store.add_single(name);

    if json {
        println!("{}", serde_json::to_string_pretty(store.items())?);
    } else if added {
        let name = name.trim();
        println!("Added '{name}' to the shopping list");
    } else {
        let name = name.trim();
        println!("'{name}' is already on the list");
    }

    Ok(())
}

pub(crate) async fn cmd_shopping_add_recipe(
    api: &DummyJsonClient,
    store: &mut ShoppingListStore,
    id: i64,
    json: bool,
) -> Result<()> {
    let recipe = api.get_async(id).await?;
    let total = recipe.ingredients.len();
    let added = store.add_many(&recipe.ingredients, &recipe.name);

    if json {
        println!("{}", serde_json::to_string_pretty(store.items())?);
    } else {
        let name = &recipe.name;
        println!("Added {added} of {total} ingredients from '{name}'");
        let skipped = total - added;
        if skipped > 0 {
            println!("({skipped} already on the list)");
        }
    }

    Ok(())
}

pub(crate) fn cmd_shopping_remove(store: &mut ShoppingListStore, id: &str, json: bool) -> Result<()> {
    if !store.remove(id) {
        bail!("No shopping item with id '{id}'");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(store.items())?);
    } else {
        println!("Removed item {id}");
    }

    Ok(())
}

pub(crate) fn cmd_shopping_check(store: &mut ShoppingListStore, id: &str, json: bool) -> Result<()> {
    if !store.toggle_checked(id) {
        bail!("No shopping item with id '{id}'");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(store.items())?);
    } else {
        let item = store.items().iter().find(|i| i.id == id);
        if let Some(item) = item {
            let name = &item.name;
            if item.checked {
                println!("Checked off '{name}'");
            } else {
                println!("Unchecked '{name}'");
            }
        }
    }

    Ok(())
}

pub(crate) fn cmd_shopping_clear_checked(store: &mut ShoppingListStore, json: bool) -> Result<()> {
    let removed = store.clear_checked();

    if json {
        println!("{}", serde_json::to_string_pretty(store.items())?);
    } else {
        println!("Removed {removed} completed item{}", if removed == 1 { "" } else { "s" });
    }

    Ok(())
}

pub(crate) fn cmd_shopping_clear(store: &mut ShoppingListStore, json: bool) -> Result<()> {
    store.clear_all();

    if json {
        println!("[]");
    } else {
        println!("Cleared the shopping list");
    }

    Ok(())
}

pub(crate) fn cmd_shopping_list(
    store: &ShoppingListStore,
    sort: SortBy,
    hide_completed: bool,
    json: bool,
) -> Result<()> {
    if store.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("Shopping list is empty");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(store.items())?);
        return Ok(());
    }

    let sorted = sorted_refs(store.items(), sort);
    let (pending, done): (Vec<&ShoppingItem>, Vec<&ShoppingItem>) =
        sorted.into_iter().partition(|i| !i.checked);

    if !pending.is_empty() {
        println!("To buy ({}):", pending.len());
        print_shopping_table(&pending);
    }
    if !hide_completed && !done.is_empty() {
        println!("Completed ({}):", done.len());
        print_shopping_table(&done);
    }

    Ok(())
}

pub(crate) fn cmd_shopping_export(store: &ShoppingListStore, output: Option<&Path>) -> Result<()> {
    if store.is_empty() {
        eprintln!("Shopping list is empty");
        process::exit(2);
    }

    let refs = sorted_refs(store.items(), SortBy::Added);
    let text = export_text(&refs, store.unchecked_count());

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported shopping list to {}", path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use ladle_core::storage::MemoryStorage;

    #[test]
    fn test_export_writes_file() {
        let mut store = ShoppingListStore::load(Arc::new(MemoryStorage::new()));
        store.add_many(["milk", "eggs"], "Pancakes");
        let milk_id = store.items()[0].id.clone();
        store.toggle_checked(&milk_id);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        cmd_shopping_export(&store, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("✅ milk (from: Pancakes)"));
        assert!(text.contains("◻️ eggs (from: Pancakes)"));
        assert!(text.ends_with("Total: 1 items to buy"));
    }

    #[test]
    fn test_export_fails_on_unwritable_path() {
        let mut store = ShoppingListStore::load(Arc::new(MemoryStorage::new()));
        store.add_single("flour");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("list.txt");
        assert!(cmd_shopping_export(&store, Some(&path)).is_err());
    }
}
