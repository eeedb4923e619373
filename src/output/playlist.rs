//! M3U playlists and HTML link pages.
//!
//! Both formats share one traversal: each category becomes one artifact,
//! rebuilt from scratch, holding one entry per category ref or media item.

use async_trait::async_trait;

use super::{writer, NamePolicy, OutputError, PathPlanner, RenderMode, RenderSummary, Renderer};
use crate::domain::{Category, Entry, OutputTarget};

/// Artifact format written by [`PlaylistRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistFormat {
    /// Extended M3U
    M3u,

    /// Plain page of hyperlinks
    Html,
}

impl PlaylistFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::M3u => ".m3u",
            Self::Html => ".html",
        }
    }

    /// Written once when the artifact is created
    pub fn header(self) -> &'static str {
        match self {
            Self::M3u => "#EXTM3U\n",
            Self::Html => "<!DOCTYPE html>\n<head><meta charset=\"utf-8\" /></head>",
        }
    }

    /// One entry pointing at `source`
    pub fn entry(self, name: &str, source: &str) -> String {
        match self {
            Self::M3u => format!("#EXTINF:0,{}\n{}\n", name, source),
            Self::Html => format!("\n<a href=\"{}\">{}</a><br>", source, name),
        }
    }
}

/// Renders a catalog into a tree of playlists or link pages
#[derive(Debug, Clone)]
pub struct PlaylistRenderer {
    planner: PathPlanner,
    format: PlaylistFormat,
}

impl PlaylistRenderer {
    pub fn new(
        target: OutputTarget,
        format: PlaylistFormat,
        mode: RenderMode,
        policy: NamePolicy,
    ) -> Self {
        Self {
            planner: PathPlanner::new(target, mode, policy, format.extension()),
            format,
        }
    }

    /// Nested M3U tree
    pub fn m3u(target: OutputTarget, policy: NamePolicy) -> Self {
        Self::new(target, PlaylistFormat::M3u, RenderMode::Nested, policy)
    }

    /// Flat M3U files for players that cannot follow nested playlists
    pub fn m3u_flat(target: OutputTarget, policy: NamePolicy) -> Self {
        Self::new(target, PlaylistFormat::M3u, RenderMode::Flat, policy)
    }

    /// Nested HTML pages
    pub fn html(target: OutputTarget, policy: NamePolicy) -> Self {
        Self::new(target, PlaylistFormat::Html, RenderMode::Nested, policy)
    }

    /// Lines (name, source) a category contributes, in order
    fn lines(&self, category: &Category, plan: &super::Plan) -> (Vec<(String, String)>, usize) {
        let mut lines = Vec::with_capacity(category.content.len());
        let mut skipped = 0;

        for entry in &category.content {
            match entry {
                Entry::Category(_) if self.planner.mode() == RenderMode::Flat => skipped += 1,
                Entry::Category(child) => lines.push((
                    child.name.to_uppercase(),
                    plan.category_source(&child.key, self.planner.extension()),
                )),
                Entry::Media(item) => lines.push((item.name.clone(), plan.media_source(item))),
            }
        }

        (lines, skipped)
    }
}

#[async_trait]
impl Renderer for PlaylistRenderer {
    fn name(&self) -> &str {
        match self.format {
            PlaylistFormat::M3u => "m3u",
            PlaylistFormat::Html => "html",
        }
    }

    async fn render(&self, categories: &[Category]) -> Result<RenderSummary, OutputError> {
        let mut summary = RenderSummary::default();

        for category in categories {
            let plan = self.planner.plan(category);

            // Start on a clean file
            writer::remove_stale(&plan.output).await?;

            let (lines, skipped) = self.lines(category, &plan);
            summary.skipped += skipped;

            // No lines, no artifact
            if lines.is_empty() {
                continue;
            }

            writer::ensure_initialized(&plan.output, self.format.header()).await?;
            for (name, source) in &lines {
                writer::append(&plan.output, &self.format.entry(name, source)).await?;
            }

            tracing::debug!(
                "Wrote {} entries to {}",
                lines.len(),
                plan.output.display()
            );
            summary.artifacts += 1;
            summary.entries += lines.len();
        }

        Ok(summary)
    }
}
