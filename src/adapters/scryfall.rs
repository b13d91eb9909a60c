use crate::domain::model::{ColorIdentityQuery, ScryfallCard, SearchPage};
use crate::domain::ports::{CardSearch, ConfigProvider};
use crate::utils::error::{FinderError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.scryfall.com";
pub const DEFAULT_USER_AGENT: &str = concat!("commander-finder/", env!("CARGO_PKG_VERSION"));

/// Scryfall's error object, sent with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    details: Option<String>,
}

/// `CardSearch` over the Scryfall `/cards/search` endpoint.
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: Client,
    endpoint: String,
    max_pages: u32,
}

impl ScryfallClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = build_client(DEFAULT_USER_AGENT, Duration::from_secs(10))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            max_pages: 1,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = build_client(config.user_agent(), config.request_timeout())?;
        Ok(Self {
            client,
            endpoint: config.api_endpoint().to_string(),
            max_pages: config.max_pages(),
        })
    }

    /// Follow `next_page` links until this many pages were read.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    fn search_url(&self) -> String {
        format!("{}/cards/search", self.endpoint.trim_end_matches('/'))
    }

    async fn fetch_page(&self, request: RequestBuilder) -> Result<SearchPage> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let details = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.details);

            return Err(FinderError::search_failed(match details {
                Some(details) => format!("HTTP {}: {}", status, details),
                None => format!("HTTP {}", status),
            }));
        }

        let page: SearchPage = response.json().await?;
        Ok(page)
    }
}

fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| FinderError::ConfigError {
            message: format!("cannot build HTTP client: {}", e),
        })
}

#[async_trait]
impl CardSearch for ScryfallClient {
    async fn search(&self, query: ColorIdentityQuery) -> Result<Vec<ScryfallCard>> {
        let url = self.search_url();
        tracing::debug!("Making API request to: {} (q={})", url, query);

        let mut page = self
            .fetch_page(self.client.get(&url).query(&[("q", query.as_str())]))
            .await?;
        if let Some(total) = page.total_cards {
            tracing::debug!("Upstream reports {} matching cards", total);
        }

        let mut cards = std::mem::take(&mut page.data);
        let mut pages = 1;

        while page.has_more && pages < self.max_pages {
            let Some(next) = page.next_page.take() else {
                tracing::warn!("Response has more results but no next_page link");
                break;
            };

            tracing::debug!("Fetching page {}: {}", pages + 1, next);
            page = self.fetch_page(self.client.get(&next)).await?;
            cards.append(&mut page.data);
            pages += 1;
        }

        if page.has_more {
            tracing::info!(
                "More results available upstream; stopped after {} page(s)",
                pages
            );
        }

        Ok(cards)
    }
}
