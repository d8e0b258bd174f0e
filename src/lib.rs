pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, PageConfig};

pub use app::{PageRenderer, RenderedPage};
pub use core::{document::Document, engine::RenderEngine, icons::IconSet};
pub use utils::error::{PageError, Result};
