//! Plain listing of media sources.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use super::paths::relative_path;
use super::{OutputError, RenderSummary, Renderer};
use crate::domain::Category;

/// Prints one source per media item: the local file relative to the work
/// dir if downloaded, the URL otherwise
#[derive(Debug, Clone)]
pub struct StdoutRenderer {
    wd: PathBuf,
    uniq: bool,
}

impl StdoutRenderer {
    pub fn new(wd: impl Into<PathBuf>) -> Self {
        Self {
            wd: wd.into(),
            uniq: false,
        }
    }

    /// Collapse duplicates; output is then sorted, not in traversal order
    pub fn unique(mut self, uniq: bool) -> Self {
        self.uniq = uniq;
        self
    }

    /// Sources in the order they will be printed
    pub fn sources(&self, categories: &[Category]) -> Vec<String> {
        let out = categories
            .iter()
            .flat_map(Category::media)
            .map(|item| match &item.file {
                Some(file) => relative_path(file, &self.wd).to_string_lossy().into_owned(),
                None => item.url.clone(),
            });

        if self.uniq {
            out.collect::<BTreeSet<_>>().into_iter().collect()
        } else {
            out.collect()
        }
    }

    /// Write the listing to any sink
    pub fn write_to<W: Write>(&self, categories: &[Category], out: &mut W) -> std::io::Result<usize> {
        let sources = self.sources(categories);
        for source in &sources {
            writeln!(out, "{}", source)?;
        }
        out.flush()?;
        Ok(sources.len())
    }
}

#[async_trait]
impl Renderer for StdoutRenderer {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn render(&self, categories: &[Category]) -> Result<RenderSummary, OutputError> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        let entries = self
            .write_to(categories, &mut lock)
            .map_err(|e| OutputError::io(std::path::Path::new("<stdout>"), e))?;

        Ok(RenderSummary {
            entries,
            ..Default::default()
        })
    }
}
