use crate::adapters::scryfall::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use crate::core::ConfigProvider;
use crate::domain::model::DetailLink;
use crate::utils::error::{FinderError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "./.commander-finder";
pub const MAX_PAGES_LIMIT: u32 = 20;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub random: RandomConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_pages: u32,
    pub detail_link: DetailLink,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            max_pages: 1,
            detail_link: DetailLink::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    pub seed: Option<u64>,
}

impl FinderConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| FinderError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parses `content`, resolving `${VAR}` through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = Self::substitute_vars(content, lookup);

        toml::from_str(&processed).map_err(|e| FinderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the looked-up value; unknown variables are
    /// left as written.
    fn substitute_vars<F>(content: &str, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for FinderConfig {
    fn api_endpoint(&self) -> &str {
        &self.api.endpoint
    }

    fn user_agent(&self) -> &str {
        &self.api.user_agent
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn max_pages(&self) -> u32 {
        self.api.max_pages
    }

    fn detail_link(&self) -> DetailLink {
        self.api.detail_link
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn seed(&self) -> Option<u64> {
        self.random.seed
    }
}

impl Validate for FinderConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.endpoint", &self.api.endpoint)?;
        validate_non_empty_string("api.user_agent", &self.api.user_agent)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;
        validate_range("api.max_pages", self.api.max_pages, 1, MAX_PAGES_LIMIT)?;
        validate_path("storage.data_dir", &self.storage.data_dir)?;
        Ok(())
    }
}
