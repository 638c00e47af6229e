use character_browser::app::ports::CatalogPort;
use character_browser::config::Config;
use character_browser::constants::DEFAULT_CONFIG_PATH;
use character_browser::infra::http_client::ReqwestHttp;
use character_browser::reconciler::{ListState, Reconciler, ViewScope};
use character_browser::{logging, storage, Character, FavoritesStore, RemoteCatalog};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "character_browser")]
#[command(about = "Browse, search and favorite Rick and Morty characters")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog, loading pages until N pages are shown
    Browse {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search characters by name
    Search {
        term: String,
        /// Only show matches that are favorites
        #[arg(long)]
        favorites: bool,
    },
    /// List favorite characters
    Favorites,
    /// Toggle a character's favorite flag
    Toggle { id: u32 },
    /// Show one character's details
    Show { id: u32 },
}

fn print_list(state: &ListState) {
    let rows = state.display();
    if rows.is_empty() {
        if state.query().is_active() {
            println!("No characters named '{}'.", state.query());
        } else {
            println!("Nothing to show.");
        }
        return;
    }
    for row in rows {
        let heart = if row.is_favorite { "♥" } else { " " };
        println!(
            "{} {:>4}  {:<32} {}",
            heart, row.character.id, row.character.name, row.character.species
        );
    }
}

fn print_details(character: &Character, is_favorite: bool) {
    println!("{} (#{}){}", character.name, character.id, if is_favorite { " ♥" } else { "" });
    println!("   Status:   {}", character.status);
    println!("   Species:  {}", character.species);
    if !character.kind.is_empty() {
        println!("   Type:     {}", character.kind);
    }
    println!("   Gender:   {}", character.gender);
    println!("   Origin:   {}", character.origin.name);
    println!("   Location: {}", character.location.name);
    println!("   Image:    {}", character.image);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let _log_guard = logging::init_logging(&config.logging.dir);

    let http = Arc::new(ReqwestHttp::new(config.catalog.timeout())?);
    let catalog: Arc<dyn CatalogPort> =
        Arc::new(RemoteCatalog::new(http, config.catalog.base_url.clone()));
    let kv = storage::open_store(&config.favorites)?;
    let mut favorites = FavoritesStore::open(kv, config.favorites.policy);

    match cli.command {
        Commands::Browse { pages } => {
            let mut reconciler =
                Reconciler::new(catalog, ViewScope::Browse, favorites.favorites().clone());
            reconciler.start().await;
            while reconciler.state().next_page() <= pages && reconciler.state().has_more() {
                let before = reconciler.state().next_page();
                reconciler.load_more().await;
                if reconciler.state().next_page() == before {
                    warn!("Stopped paging at page {}", before);
                    break;
                }
            }
            print_list(reconciler.state());
        }
        Commands::Search { term, favorites: scoped } => {
            let scope = if scoped { ViewScope::Favorites } else { ViewScope::Browse };
            let mut reconciler = Reconciler::new(catalog, scope, favorites.favorites().clone());
            reconciler.search(&term).await;
            print_list(reconciler.state());
        }
        Commands::Favorites => {
            let mut reconciler =
                Reconciler::new(catalog, ViewScope::Favorites, favorites.favorites().clone());
            reconciler.start().await;
            print_list(reconciler.state());
        }
        Commands::Toggle { id } => {
            let updated = favorites.toggle(id);
            info!("Favorites now hold {} characters", updated.len());
            println!(
                "Character {} is {}",
                id,
                if updated.get(id) { "a favorite ♥" } else { "not a favorite" }
            );
        }
        Commands::Show { id } => match catalog.fetch_character(id).await {
            Ok(character) => print_details(&character, favorites.is_favorite(id)),
            Err(e) => {
                warn!("Could not load character {}: {}", id, e);
                println!("Character {} is unavailable.", id);
            }
        },
    }

    Ok(())
}
