use crate::domain::model::{ColorIdentityQuery, DetailLink, ScryfallCard};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn max_pages(&self) -> u32;
    fn detail_link(&self) -> DetailLink;
    fn data_dir(&self) -> &str;
    fn seed(&self) -> Option<u64>;
}

/// The card search collaborator. Returns raw upstream records in upstream
/// order, or `SearchFailed` for any non-success outcome.
#[async_trait]
pub trait CardSearch: Send + Sync {
    async fn search(&self, query: ColorIdentityQuery) -> Result<Vec<ScryfallCard>>;
}
