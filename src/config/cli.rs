use crate::config::toml_config::FinderConfig;
use crate::domain::model::Theme;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "commander-finder", version)]
#[command(about = "Find Commander-legal commanders by color identity")]
pub struct CliConfig {
    #[arg(long, global = true, env = "COMMANDER_FINDER_CONFIG", help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "COMMANDER_FINDER_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    #[arg(long, global = true, env = "COMMANDER_FINDER_DATA_DIR", help = "Where favorites and theme are kept")]
    pub data_dir: Option<String>,

    #[arg(long, global = true, help = "Maximum result pages to fetch")]
    pub max_pages: Option<u32>,

    #[arg(long, global = true, help = "Seed for reproducible random picks")]
    pub seed: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List commanders of a color identity, e.g. `search blue black` or `search UB`
    Search {
        #[arg(required = true, num_args = 1..)]
        colors: Vec<String>,

        #[arg(long, help = "Show one random match instead of all")]
        random: bool,
    },
    /// Search with a randomly generated color identity
    Random {
        #[arg(long, help = "Show every match instead of one")]
        all: bool,
    },
    /// Print a random color identity
    Identity,
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum FavoritesAction {
    List,
    /// Look up a commander by exact name and save it
    Add {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    Remove {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    Clear,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

impl CliConfig {
    /// Effective configuration: defaults, then the TOML file, then flags.
    pub fn settings(&self) -> Result<FinderConfig> {
        let mut config = match &self.config {
            Some(path) => FinderConfig::from_file(path)?,
            None => FinderConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.api.max_pages = max_pages;
        }
        if self.seed.is_some() {
            config.random.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}
