pub mod collection;
pub mod document;
pub mod engine;
pub mod icons;
pub mod interactions;
pub mod pipeline;
pub mod source;

pub use crate::domain::model::{LoadOutcome, LoadState, RenderReport, RenderedCollection};
pub use crate::domain::ports::{ConfigProvider, ContentSource, IconHydrator, Pipeline, Storage};
pub use crate::utils::error::Result;
