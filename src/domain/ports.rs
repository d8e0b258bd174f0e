use crate::core::document::Document;
use crate::domain::model::{LoadOutcome, RenderedCollection};
use crate::utils::error::{PageError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the content document comes from.
pub trait ContentSource: Send + Sync {
    fn fetch(&self) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn site_dir(&self) -> &str;
    fn page_path(&self) -> &str;
    fn content_location(&self) -> &str;
    fn output_path(&self) -> &str;
    fn trusted_content(&self) -> bool;
    fn icon_file(&self) -> Option<&str>;
    fn timeout(&self) -> Option<std::time::Duration>;
}

/// Turns symbolic icon placeholders into rendered glyphs. Returns the
/// number of placeholders replaced.
pub trait IconHydrator: Send + Sync {
    fn hydrate(&self, document: &mut Document) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Entry: Send + Sync;

    fn collection(&self) -> &'static str;
    async fn extract(&self) -> Result<Vec<Self::Entry>>;
    async fn transform(&self, entries: Vec<Self::Entry>) -> Result<RenderedCollection>;
    async fn load(&self, rendered: RenderedCollection) -> Result<LoadOutcome>;
    async fn fallback(&self, error: &PageError) -> LoadOutcome;
}
