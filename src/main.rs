use clap::Parser;
use commander_finder::config::cli::{Command, FavoritesAction, ThemeAction};
use commander_finder::core::ConfigProvider;
use commander_finder::utils::logger;
use commander_finder::{
    generate_random_color_identity, seeded_rng, CliConfig, CommanderFinder, CommanderRecord,
    FinderConfig, LocalStorage, Result, ScryfallClient, SearchOutcome, SelectionMode, StateStore,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::info!("Starting commander-finder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let settings = cli.settings()?;

    match cli.command {
        Command::Search { colors, random } => {
            let finder = build_finder(&settings)?;
            let mode = if random {
                SelectionMode::RandomOne
            } else {
                SelectionMode::All
            };
            let outcome = finder.find(&colors.join(" "), mode).await?;
            print_outcome(&outcome);
        }
        Command::Random { all } => {
            let finder = build_finder(&settings)?;
            let mode = if all {
                SelectionMode::All
            } else {
                SelectionMode::RandomOne
            };
            let (code, outcome) = finder.find_random_identity(mode).await?;
            println!("🎲 Color identity: {}", code);
            print_outcome(&outcome);
        }
        Command::Identity => {
            let mut rng = seeded_rng(settings.seed());
            println!("{}", generate_random_color_identity(&mut rng));
        }
        Command::Favorites { action } => run_favorites(&settings, action).await?,
        Command::Theme { action } => run_theme(&settings, action).await?,
    }

    Ok(())
}

fn build_finder(settings: &FinderConfig) -> Result<CommanderFinder<ScryfallClient>> {
    let client = ScryfallClient::from_config(settings)?;
    Ok(CommanderFinder::from_config(client, settings))
}

fn state_store(settings: &FinderConfig) -> StateStore<LocalStorage> {
    let storage = LocalStorage::new(settings.data_dir());
    tracing::debug!("Using data directory {}", storage.base_path().display());
    StateStore::new(storage)
}

async fn run_favorites(settings: &FinderConfig, action: FavoritesAction) -> Result<()> {
    let store = state_store(settings);
    let state = store.load().await?;

    match action {
        FavoritesAction::List => {
            if state.favorites.is_empty() {
                println!("No favorites yet.");
            }
            for (i, record) in state.favorites.iter().enumerate() {
                print_record(i + 1, record);
            }
        }
        FavoritesAction::Add { name } => {
            let name = name.join(" ");
            let finder = build_finder(settings)?;
            match finder.find_by_name(&name).await? {
                Some(record) if state.is_favorite(&record.name) => {
                    println!("⭐ {} is already a favorite.", record.name);
                }
                Some(record) => {
                    println!("⭐ Added {}", record.name);
                    store.save(&state.with_favorite(record)).await?;
                }
                None => println!("No commander named \"{}\" found.", name),
            }
        }
        FavoritesAction::Remove { name } => {
            let name = name.join(" ");
            if state.is_favorite(&name) {
                store.save(&state.without_favorite(&name)).await?;
                println!("Removed {}", name);
            } else {
                println!("{} is not a favorite.", name);
            }
        }
        FavoritesAction::Clear => {
            let count = state.favorites.len();
            store.save(&state.without_favorites()).await?;
            println!("Cleared {} favorites.", count);
        }
    }

    Ok(())
}

async fn run_theme(settings: &FinderConfig, action: ThemeAction) -> Result<()> {
    let store = state_store(settings);
    let state = store.load().await?;

    let state = match action {
        ThemeAction::Show => {
            println!("{}", state.theme);
            return Ok(());
        }
        ThemeAction::Toggle => state.with_toggled_theme(),
        ThemeAction::Set { theme } => state.with_theme(theme),
    };

    store.save(&state).await?;
    println!("Theme: {}", state.theme);
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    let records = outcome.records();
    if records.is_empty() {
        println!("No commanders found.");
        return;
    }

    for (i, record) in records.into_iter().enumerate() {
        print_record(i + 1, record);
    }
}

fn print_record(position: usize, record: &CommanderRecord) {
    println!("{:>3}. {}", position, record.name);
    if let Some(image) = record.image_url() {
        println!("     image:   {}", image);
    }
    println!("     details: {}", record.detail_url);
}
