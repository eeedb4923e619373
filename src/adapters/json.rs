//! Catalog read from a JSON file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;

use super::CatalogProvider;
use crate::domain::Category;

/// Reads `[Category, ...]` from a file written by an external indexer
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogProvider for JsonCatalog {
    fn name(&self) -> &str {
        "json"
    }

    async fn derive_categories(&self) -> Result<Vec<Category>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read catalog: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog JSON: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entry;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_catalog_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(
            &path,
            r#"[
                {"key": "start", "name": "Start", "home": true,
                 "content": [{"type": "category", "key": "movies", "name": "Movies"}]},
                {"key": "movies", "name": "Movies",
                 "content": [{"type": "media", "name": "Clip 1", "url": "http://x/1.mp4"}]}
            ]"#,
        )
        .await
        .unwrap();

        let categories = JsonCatalog::new(&path).derive_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert!(matches!(categories[1].content[0], Entry::Media(_)));
    }

    #[tokio::test]
    async fn test_missing_file_has_context() {
        let err = JsonCatalog::new("/nonexistent/catalog.json")
            .derive_categories()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }
}
