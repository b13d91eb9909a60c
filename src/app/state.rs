//! Favorites and theme as an explicit state value.
//!
//! Updates are pure: each takes the state by value and returns the new one.
//! Persistence happens only through [`StateStore::load`] and
//! [`StateStore::save`].

use crate::core::{CommanderRecord, Storage};
use crate::domain::model::Theme;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

pub const FAVORITES_KEY: &str = "favorites";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub favorites: Vec<CommanderRecord>,
    pub theme: Theme,
}

impl AppState {
    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites
            .iter()
            .any(|fav| fav.name.eq_ignore_ascii_case(name))
    }

    /// Appends `record` unless a favorite with the same name exists.
    pub fn with_favorite(mut self, record: CommanderRecord) -> Self {
        if !self.is_favorite(&record.name) {
            self.favorites.push(record);
        }
        self
    }

    pub fn without_favorite(mut self, name: &str) -> Self {
        self.favorites
            .retain(|fav| !fav.name.eq_ignore_ascii_case(name));
        self
    }

    pub fn without_favorites(mut self) -> Self {
        self.favorites.clear();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_toggled_theme(self) -> Self {
        let theme = self.theme.toggled();
        self.with_theme(theme)
    }
}

/// Loads and saves [`AppState`] as one JSON document per key.
pub struct StateStore<S: Storage> {
    storage: S,
}

impl<S: Storage> StateStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Missing or unreadable entries fall back to defaults.
    pub async fn load(&self) -> Result<AppState> {
        let favorites: Vec<CommanderRecord> = self.load_key(FAVORITES_KEY).await?.unwrap_or_default();
        let theme: Theme = self.load_key(THEME_KEY).await?.unwrap_or_default();

        tracing::debug!(
            "Loaded state: {} favorites, {} theme",
            favorites.len(),
            theme
        );
        Ok(AppState { favorites, theme })
    }

    pub async fn save(&self, state: &AppState) -> Result<()> {
        let favorites = serde_json::to_vec_pretty(&state.favorites)?;
        self.storage
            .write_file(&key_path(FAVORITES_KEY), &favorites)
            .await?;

        let theme = serde_json::to_vec(&state.theme)?;
        self.storage.write_file(&key_path(THEME_KEY), &theme).await?;
        Ok(())
    }

    async fn load_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self.storage.read_file(&key_path(key)).await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable '{}' entry: {}", key, e);
                Ok(None)
            }
        }
    }
}

fn key_path(key: &str) -> String {
    format!("{}.json", key)
}
