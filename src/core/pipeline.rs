use crate::core::collection::{Collection, Escape};
use crate::core::document::{Document, Selector};
use crate::core::{ContentSource, IconHydrator, LoadOutcome, Pipeline, RenderedCollection};
use crate::utils::error::{PageError, Result};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SharedDocument = Arc<Mutex<Document>>;

pub fn shared(document: Document) -> SharedDocument {
    Arc::new(Mutex::new(document))
}

/// Fetch, render and mount one collection into its container.
pub struct CollectionPipeline<C: Collection, S: ContentSource, H: IconHydrator> {
    source: Arc<S>,
    hydrator: Arc<H>,
    document: SharedDocument,
    escape: Escape,
    _collection: PhantomData<fn() -> C>,
}

impl<C: Collection, S: ContentSource, H: IconHydrator> CollectionPipeline<C, S, H> {
    pub fn new(source: Arc<S>, hydrator: Arc<H>, document: SharedDocument) -> Self {
        Self {
            source,
            hydrator,
            document,
            escape: Escape::default(),
            _collection: PhantomData,
        }
    }

    pub fn with_escape(mut self, escape: Escape) -> Self {
        self.escape = escape;
        self
    }

    fn container() -> Selector {
        Selector::id(C::CONTAINER_ID)
    }
}

#[async_trait::async_trait]
impl<C: Collection, S: ContentSource, H: IconHydrator> Pipeline for CollectionPipeline<C, S, H> {
    type Entry = C::Entry;

    fn collection(&self) -> &'static str {
        C::KEY
    }

    async fn extract(&self) -> Result<Vec<C::Entry>> {
        tracing::debug!("Fetching {} from {}", C::KEY, self.source.describe());
        let bytes = self.source.fetch().await?;

        let mut content: serde_json::Value = serde_json::from_slice(&bytes)?;
        let collection = content
            .get_mut(C::KEY)
            .map(serde_json::Value::take)
            .filter(|value| !value.is_null())
            .ok_or_else(|| PageError::MissingCollectionError {
                key: C::KEY.to_string(),
            })?;

        Ok(serde_json::from_value(collection)?)
    }

    async fn transform(&self, entries: Vec<C::Entry>) -> Result<RenderedCollection> {
        Ok(RenderedCollection {
            markup: C::render_all(&entries, self.escape),
            entries: entries.len(),
        })
    }

    async fn load(&self, rendered: RenderedCollection) -> Result<LoadOutcome> {
        let mut document = self.document.lock().await;

        if !document.set_inner_html(&Self::container(), &rendered.markup) {
            tracing::debug!("No #{} on this page, skipping {}", C::CONTAINER_ID, C::KEY);
            return Ok(LoadOutcome::NoContainer);
        }

        let hydrated = self.hydrator.hydrate(&mut document);
        tracing::info!(
            "Rendered {} {} into #{} ({} icons)",
            rendered.entries,
            C::KEY,
            C::CONTAINER_ID,
            hydrated
        );

        Ok(LoadOutcome::Mounted {
            entries: rendered.entries,
        })
    }

    async fn fallback(&self, error: &PageError) -> LoadOutcome {
        let mut document = self.document.lock().await;
        if document.set_inner_html(&Self::container(), C::FALLBACK) {
            tracing::debug!("Mounted fallback message into #{}", C::CONTAINER_ID);
        }
        LoadOutcome::Failed {
            reason: error.to_string(),
        }
    }
}
