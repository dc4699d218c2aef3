mod commands;
mod config;
mod dummyjson;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    cmd_browse, cmd_favorite_add, cmd_favorite_list, cmd_favorite_remove, cmd_favorite_toggle,
    cmd_search, cmd_shopping_add, cmd_shopping_add_recipe, cmd_shopping_check, cmd_shopping_clear,
    cmd_shopping_clear_checked, cmd_shopping_export, cmd_shopping_list, cmd_shopping_remove,
    cmd_show,
};
use crate::config::Config;
use crate::dummyjson::DummyJsonClient;
use ladle_core::dummyjson::{RecipeFilters, parse_time_band};
use ladle_core::favorites::FavoritesStore;
use ladle_core::shopping::ShoppingListStore;
use ladle_core::storage::{FileStorage, Storage};

#[derive(Parser)]
#[command(
    name = "ladle",
    version,
    about = "A simple recipe browser CLI",
    long_about = "\n\n  ██╗      █████╗ ██████╗ ██╗     ███████╗
  ██║     ██╔══██╗██╔══██╗██║     ██╔════╝
  ██║     ███████║██║  ██║██║     █████╗
  ██║     ██╔══██║██║  ██║██║     ██╔══╝
  ███████╗██║  ██║██████╔╝███████╗███████╗
  ╚══════╝╚═╝  ╚═╝╚═════╝ ╚══════╝╚══════╝
        browse, save, shop.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse recipes, with optional cuisine and client-side filters
    Browse {
        /// Cuisine to browse (e.g. "Italian")
        #[arg(short, long)]
        cuisine: Option<String>,
        /// Total-time filter: quick (<=30 min), medium (31-60), long (>60)
        #[arg(long)]
        time: Option<String>,
        /// Difficulty filter (e.g. "Easy")
        #[arg(long)]
        difficulty: Option<String>,
        /// Minimum rating (0-5)
        #[arg(long)]
        min_rating: Option<f64>,
        /// Tag filter (substring match)
        #[arg(long)]
        tag: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search recipes by name
    Search {
        /// Search query
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show full recipe details (ingredients + instructions)
    Show {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage favorite recipes
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
    /// Manage the shopping list
    Shopping {
        #[command(subcommand)]
        command: ShoppingCommands,
    },
}

#[derive(Subcommand)]
enum FavoriteCommands {
    /// Add a recipe to favorites (no-op if already present)
    Add {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a recipe from favorites
    Remove {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle a recipe's favorite status
    Toggle {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved favorites
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ShoppingCommands {
    /// Add a single item by name
    Add {
        /// Item name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add all ingredients of a recipe
    AddRecipe {
        /// Recipe ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an item by its id
    Remove {
        /// Shopping item id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle an item's checked status
    Check {
        /// Shopping item id
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove all checked items
    ClearChecked {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Empty the entire list
    Clear {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the shopping list
    List {
        /// Sort order: added, name, recipe
        #[arg(long, default_value = "added")]
        sort: String,
        /// Hide completed items
        #[arg(long)]
        hide_completed: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the list as plain text
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ladle=warn,ladle_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.data_dir));
    let mut favorites = FavoritesStore::load(Arc::clone(&storage));
    let mut shopping = ShoppingListStore::load(storage);
    let api = DummyJsonClient::new();

    match cli.command {
        Commands::Browse {
            cuisine,
            time,
            difficulty,
            min_rating,
            tag,
            json,
        } => {
            let filters = RecipeFilters {
                time: time.as_deref().map(parse_time_band).transpose()?,
                difficulty,
                min_rating,
                tag,
            };
            cmd_browse(&api, &favorites, cuisine.as_deref(), &filters, json).await
        }
        Commands::Search { query, json } => cmd_search(&api, &favorites, &query, json).await,
        Commands::Show { id, json } => cmd_show(&api, &favorites, id, json).await,
        Commands::Favorite { command } => match command {
            FavoriteCommands::Add { id, json } => {
                cmd_favorite_add(&api, &mut favorites, id, json).await
            }
            FavoriteCommands::Remove { id, json } => cmd_favorite_remove(&mut favorites, id, json),
            FavoriteCommands::Toggle { id, json } => {
                cmd_favorite_toggle(&api, &mut favorites, id, json).await
            }
            FavoriteCommands::List { json } => cmd_favorite_list(&favorites, json),
        },
        Commands::Shopping { command } => match command {
            ShoppingCommands::Add { name, json } => cmd_shopping_add(&mut shopping, &name, json),
            ShoppingCommands::AddRecipe { id, json } => {
                cmd_shopping_add_recipe(&api, &mut shopping, id, json).await
            }
            ShoppingCommands::Remove { id, json } => cmd_shopping_remove(&mut shopping, &id, json),
            ShoppingCommands::Check { id, json } => cmd_shopping_check(&mut shopping, &id, json),
            ShoppingCommands::ClearChecked { json } => {
                cmd_shopping_clear_checked(&mut shopping, json)
            }
            ShoppingCommands::Clear { json } => cmd_shopping_clear(&mut shopping, json),
            ShoppingCommands::List {
                sort,
                hide_completed,
                json,
            } => {
                let sort = commands::parse_sort(&sort)?;
                cmd_shopping_list(&shopping, sort, hide_completed, json)
            }
            ShoppingCommands::Export { output } => {
                cmd_shopping_export(&shopping, output.as_deref())
            }
        },
    }
}
