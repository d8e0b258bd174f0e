pub mod cli;
pub mod site_config;

use crate::core::interactions::InteractionConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use site_config::SiteConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "portfolio-page")]
#[command(about = "Render portfolio projects and skills into a static page")]
pub struct CliConfig {
    #[arg(long, help = "TOML site configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Directory holding the page and content document [default: .]")]
    pub site_dir: Option<String>,

    #[arg(long, help = "Page template, relative to the site directory [default: index.html]")]
    pub page: Option<String>,

    #[arg(long, help = "Content document path or http(s) URL [default: data.json]")]
    pub content: Option<String>,

    #[arg(long, help = "Output directory [default: ./dist]")]
    pub output_path: Option<String>,

    #[arg(long, help = "TOML file with extra icon glyphs")]
    pub icons: Option<String>,

    #[arg(long, help = "JSON file of page events to replay after rendering")]
    pub events: Option<String>,

    #[arg(long, help = "HTTP timeout for remote content, in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Insert content fields without HTML escaping")]
    pub trusted_content: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Layers command line flags over the optional site file and defaults.
    pub fn resolve(&self) -> Result<PageConfig> {
        let site = match &self.config {
            Some(path) => {
                tracing::debug!("Loading site configuration from {}", path);
                let site = SiteConfig::from_file(path)?;
                site.validate()?;
                site
            }
            None => SiteConfig::default(),
        };
        Ok(PageConfig::layered(self, site))
    }
}

/// Fully resolved settings for one render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub site_dir: String,
    pub page: String,
    pub content: String,
    pub output_path: String,
    pub output_filename: String,
    pub icon_file: Option<String>,
    pub events: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub trusted_content: bool,
    pub interactions: InteractionConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            site_dir: ".".to_string(),
            page: "index.html".to_string(),
            content: "data.json".to_string(),
            output_path: "./dist".to_string(),
            output_filename: "index.html".to_string(),
            icon_file: None,
            events: None,
            timeout_seconds: None,
            trusted_content: false,
            interactions: InteractionConfig::default(),
        }
    }
}

impl PageConfig {
    #[cfg(feature = "cli")]
    fn layered(cli: &CliConfig, site: SiteConfig) -> Self {
        let defaults = Self::default();
        Self {
            site_dir: cli
                .site_dir
                .clone()
                .or(site.site.dir)
                .unwrap_or(defaults.site_dir),
            page: cli.page.clone().or(site.site.page).unwrap_or(defaults.page),
            content: cli
                .content
                .clone()
                .or(site.site.content)
                .unwrap_or(defaults.content),
            output_path: cli
                .output_path
                .clone()
                .or(site.output.path)
                .unwrap_or(defaults.output_path),
            output_filename: site.output.filename.unwrap_or(defaults.output_filename),
            icon_file: cli.icons.clone().or(site.render.icon_file),
            events: cli.events.clone(),
            timeout_seconds: cli.timeout_seconds.or(site.render.timeout_seconds),
            trusted_content: cli.trusted_content || site.render.trusted_content.unwrap_or(false),
            interactions: site.interactions,
        }
    }

    pub fn is_remote_content(&self) -> bool {
        self.content.starts_with("http://") || self.content.starts_with("https://")
    }
}

impl ConfigProvider for PageConfig {
    fn site_dir(&self) -> &str {
        &self.site_dir
    }

    fn page_path(&self) -> &str {
        &self.page
    }

    fn content_location(&self) -> &str {
        &self.content
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn trusted_content(&self) -> bool {
        self.trusted_content
    }

    fn icon_file(&self) -> Option<&str> {
        self.icon_file.as_deref()
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for PageConfig {
    fn validate(&self) -> Result<()> {
        validate_path("site_dir", &self.site_dir)?;
        validate_path("page", &self.page)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_filename", &self.output_filename)?;

        if self.is_remote_content() {
            validate_url("content", &self.content)?;
        } else {
            validate_path("content", &self.content)?;
        }

        if let Some(events) = &self.events {
            validate_path("events", events)?;
        }

        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, 300)?;
        }

        Ok(())
    }
}
