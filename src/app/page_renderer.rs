use crate::core::collection::{Escape, Projects, Skills};
use crate::core::document::Document;
use crate::core::engine::RenderEngine;
use crate::core::icons::IconSet;
use crate::core::interactions::{InteractionConfig, Interactions, PageEvent};
use crate::core::pipeline::{shared, CollectionPipeline};
use crate::core::source::AnySource;
use crate::core::{ConfigProvider, ContentSource, RenderReport, Storage};
use crate::utils::error::{PageError, Result};
use std::path::Path;
use std::sync::Arc;

/// Result of rendering one page.
#[derive(Debug)]
pub struct RenderedPage {
    pub document: Document,
    pub report: RenderReport,
}

/// Page-ready handling for one page: read the template, run both collection
/// loaders, then wire the page interactions.
pub struct PageRenderer<S: Storage, C: ConfigProvider> {
    site: S,
    output: S,
    config: C,
    icons: IconSet,
    interactions: InteractionConfig,
}

impl<S: Storage, C: ConfigProvider> PageRenderer<S, C> {
    /// `site` resolves the page template, `output` receives the result.
    pub fn new(site: S, output: S, config: C) -> Self {
        Self {
            site,
            output,
            config,
            icons: IconSet::default(),
            interactions: InteractionConfig::default(),
        }
    }

    pub fn with_icons(mut self, icons: IconSet) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_interactions(mut self, interactions: InteractionConfig) -> Self {
        self.interactions = interactions;
        self
    }

    /// Loads the configured icon file on top of the current icon set.
    pub fn load_icon_file(mut self) -> Result<Self> {
        if let Some(file) = self.config.icon_file() {
            let path = Path::new(self.config.site_dir()).join(file);
            tracing::debug!("Loading icons from {}", path.display());
            self.icons = self.icons.merge_file(path)?;
        }
        Ok(self)
    }

    pub async fn load_page(&self) -> Result<Document> {
        let bytes = self.site.read_file(self.config.page_path()).await?;
        let html = String::from_utf8(bytes).map_err(|e| PageError::ConfigError {
            message: format!("Page {} is not UTF-8: {}", self.config.page_path(), e),
        })?;
        Ok(Document::parse(html))
    }

    fn escape(&self) -> Escape {
        if self.config.trusted_content() {
            Escape::Trusted
        } else {
            Escape::Html
        }
    }

    /// Renders both collections into `document` with content from `source`.
    pub async fn render_with<T: ContentSource + 'static>(
        &self,
        document: Document,
        source: T,
    ) -> Result<RenderedPage> {
        let document = shared(document);
        let source = Arc::new(source);
        let icons = Arc::new(self.icons.clone());
        let escape = self.escape();

        let projects =
            CollectionPipeline::<Projects, _, _>::new(source.clone(), icons.clone(), document.clone())
                .with_escape(escape);
        let skills = CollectionPipeline::<Skills, _, _>::new(source, icons, document.clone())
            .with_escape(escape);

        let mut engine = RenderEngine::new(projects, skills);
        let report = engine.render().await?;
        drop(engine);

        let document = match Arc::try_unwrap(document) {
            Ok(mutex) => mutex.into_inner(),
            Err(still_shared) => still_shared.lock().await.clone(),
        };
        Ok(RenderedPage { document, report })
    }

    /// Full page-ready flow using the configured content location.
    pub async fn render(&self) -> Result<RenderedPage> {
        let document = self.load_page().await?;
        let source = AnySource::from_location(
            self.config.content_location(),
            Path::new(self.config.site_dir()),
            self.config.timeout(),
        )?;
        tracing::info!("Rendering {} with content from {}", self.config.page_path(), source.describe());
        self.render_with(document, source).await
    }

    /// Wires the interactive parts against the rendered page and replays
    /// recorded events, the way a browser session would after load.
    pub fn interact(&self, document: &mut Document, events: &[PageEvent]) -> Interactions {
        let mut interactions = Interactions::wire(document, &self.interactions);
        interactions.replay(document, events);
        interactions
    }

    pub async fn write_output(&self, filename: &str, document: &Document) -> Result<String> {
        self.output
            .write_file(filename, document.html().as_bytes())
            .await?;
        let output_path = Path::new(self.config.output_path()).join(filename);
        Ok(output_path.display().to_string())
    }
}
