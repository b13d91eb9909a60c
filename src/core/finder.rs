use crate::core::resolver::{
    build_name_query, build_search_query, generate_random_color_identity, normalize,
    seeded_rng, ColorIdentityResolver,
};
use crate::core::single_flight::SingleFlight;
use crate::domain::model::{
    ColorCode, CommanderRecord, DetailLink, ScryfallCard, SearchOutcome, SelectionMode,
};
use crate::domain::ports::{CardSearch, ConfigProvider};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use std::sync::{Mutex, MutexGuard};

/// Resolve, search, map, select.
pub struct CommanderFinder<S: CardSearch> {
    search: S,
    resolver: ColorIdentityResolver,
    rng: Mutex<StdRng>,
    flight: SingleFlight,
}

impl<S: CardSearch> CommanderFinder<S> {
    pub fn new(search: S, detail_link: DetailLink) -> Self {
        Self {
            search,
            resolver: ColorIdentityResolver::new(detail_link),
            rng: Mutex::new(seeded_rng(None)),
            flight: SingleFlight::new(),
        }
    }

    pub fn from_config<C: ConfigProvider>(search: S, config: &C) -> Self {
        Self::new(search, config.detail_link()).with_seed(config.seed())
    }

    /// Makes random picks reproducible.
    pub fn with_seed(self, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                tracing::debug!("Using seeded random source ({})", seed);
                Self {
                    rng: Mutex::new(seeded_rng(Some(seed))),
                    ..self
                }
            }
            None => self,
        }
    }

    pub async fn find(&self, raw_text: &str, mode: SelectionMode) -> Result<SearchOutcome> {
        let code = normalize(raw_text)?;
        tracing::debug!("Normalized {:?} to {}", raw_text, code);
        self.find_code(&code, mode).await
    }

    /// Like [`find`](Self::find), but a later call supersedes this one, in
    /// which case `None` is returned.
    pub async fn find_latest(
        &self,
        raw_text: &str,
        mode: SelectionMode,
    ) -> Option<Result<SearchOutcome>> {
        let outcome = self.flight.run(self.find(raw_text, mode)).await;
        if outcome.is_none() {
            tracing::debug!("Search for {:?} was superseded", raw_text);
        }
        outcome
    }

    pub async fn find_code(&self, code: &ColorCode, mode: SelectionMode) -> Result<SearchOutcome> {
        let query = build_search_query(code);
        tracing::info!("🔎 Searching commanders with identity {}", code);

        let raw = self.search.search(query).await?;
        tracing::info!("Found {} commanders for {}", raw.len(), code);

        Ok(self.select(&raw, mode))
    }

    /// Searches with a freshly generated identity.
    pub async fn find_random_identity(
        &self,
        mode: SelectionMode,
    ) -> Result<(ColorCode, SearchOutcome)> {
        let code = generate_random_color_identity(&mut *self.lock_rng());
        tracing::info!("🎲 Random color identity: {}", code);

        let outcome = self.find_code(&code, mode).await?;
        Ok((code, outcome))
    }

    /// Exact-name commander lookup.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<CommanderRecord>> {
        if name.trim().is_empty() {
            tracing::warn!("Ignoring lookup for an empty commander name");
            return Ok(None);
        }

        let raw = self.search.search(build_name_query(name)).await?;
        Ok(raw.first().map(|card| self.resolver.to_display_record(card)))
    }

    fn select(&self, raw: &[ScryfallCard], mode: SelectionMode) -> SearchOutcome {
        match mode {
            SelectionMode::All => SearchOutcome::All(self.resolver.select_all(raw)),
            SelectionMode::RandomOne => {
                SearchOutcome::RandomOne(self.resolver.select_random_one(raw, &mut *self.lock_rng()))
            }
        }
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
