//! Anime Browser CLI application.

use anime_browser::command::{HELP, HELP_HINT};
use anime_browser::store::SearchState;
use anime_browser::{view, AppState, Command, FavoritesStore, LocalStorage, QueryInput, Store, ViewSignal};
use anyhow::{Context, Result};
use clap::Parser;
use jikan_client::JikanClient;
use shared::{Config, DataPaths, LogConfig};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Search to run on startup
    #[arg(short, long)]
    query: Option<String>,

    /// Remove stored favorites before starting
    #[arg(long)]
    clear_favorites: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = LogConfig::from_settings(&config.logging, &config.log_dir(), "anime-browser");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!("Anime Browser starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    // Initialize data paths
    let data_paths = DataPaths::from_config(&config);
    data_paths
        .create_dirs()
        .context("Failed to create data directories")?;
    info!(data_dir = %data_paths.root().display(), "Data directories ready");

    // Initialize favorites storage
    let storage = LocalStorage::open(data_paths.storage_dir())
        .context("Failed to open local storage")?;
    let favorites = FavoritesStore::new(storage);

    if args.clear_favorites {
        info!("Clearing favorites");
        favorites.clear().context("Failed to clear favorites")?;
    }

    // Initialize API client and store
    let client = JikanClient::from_config(&config.catalog).context("Failed to create Jikan client")?;
    let store = Store::new(client, favorites);
    let input = QueryInput::attach(store.clone(), config.debounce_delay());

    let renderer = tokio::spawn(render_loop(store.subscribe(), store.signals()));

    println!("{}", HELP_HINT);
    if let Some(query) = args.query {
        store.set_search_query(query);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if !run_command(&store, &input, command) {
            break;
        }
    }

    // Leaving the search view: abandon anything in flight
    store.cancel_search();
    renderer.abort();
    info!("Anime Browser exiting");

    Ok(())
}

/// Apply one command; returns false when the session should end
fn run_command(store: &Store, input: &QueryInput, command: Command) -> bool {
    match command {
        Command::Search(text) => input.type_text(text),
        Command::Page(page) => change_page(store, |search| search.page_target(page)),
        Command::NextPage => change_page(store, SearchState::next_page),
        Command::PrevPage => change_page(store, SearchState::previous_page),
        Command::Open(id) => store.fetch_detail(id),
        Command::Back => store.clear_detail(),
        Command::Favorite(id) => match store.toggle_favorite(id) {
            Ok(true) => println!("Added #{} to favorites", id),
            Ok(false) => println!("Removed #{} from favorites", id),
            Err(e) => println!("Could not update favorites: {:#}", e),
        },
        Command::Favorites => println!("{}", view::render_favorites(&store.snapshot().favorites)),
        Command::Clear => {
            // Supersede any text still waiting in the debouncer
            input.type_text("");
            store.set_search_query("");
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

/// Page through the results on screen; refused while a search is loading
fn change_page(store: &Store, target: impl FnOnce(&SearchState) -> Option<u32>) {
    let search = store.snapshot().search;
    match target(&search) {
        Some(page) => store.change_page(page),
        None if search.loading => println!("Still searching, try again once results are in"),
        None => println!("No such page"),
    }
}

async fn render_loop(mut states: watch::Receiver<AppState>, mut signals: broadcast::Receiver<ViewSignal>) {
    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Ok(ViewSignal::ScrollToTop) => clear_screen(),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "View signals lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                let bar = view::loading_bar(&state);
                if !bar.is_empty() {
                    println!("{}", bar);
                }
                println!("{}", view::render(&state));
            }
        }
    }
}

fn clear_screen() {
    print!("\x1B[2J\x1B[H");
    let _ = std::io::stdout().flush();
}
