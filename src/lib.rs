pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{local_storage::LocalStorage, scryfall::ScryfallClient};
pub use app::state::{AppState, StateStore};
pub use config::FinderConfig;
pub use core::finder::CommanderFinder;
pub use core::resolver::{
    build_search_query, generate_random_color_identity, normalize, random_color_identity,
    seeded_rng, ColorIdentityResolver,
};
pub use domain::model::{
    ColorCode, ColorIdentityQuery, CommanderRecord, DetailLink, ScryfallCard, SearchOutcome,
    SelectionMode, Theme,
};
pub use utils::error::{FinderError, IdentityError, Result};
