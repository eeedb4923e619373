//! Catalog providers.
//!
//! Acquiring the catalog (fetching, filtering, downloading) happens outside
//! this crate. Providers hand over the finished category tree, or for
//! streaming, the next batch of ready sources.

pub mod command;
pub mod json;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::Category;
use crate::stream::StreamBatch;

pub use command::CommandCatalog;
pub use json::JsonCatalog;

/// Source of the category tree for one render pass
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Build the categories to render, in render order
    async fn derive_categories(&self) -> Result<Vec<Category>>;
}

/// Source of streaming batches, polled once per driver iteration
#[async_trait]
pub trait StreamSource: Send {
    async fn next_batch(&mut self) -> Result<StreamBatch>;
}
