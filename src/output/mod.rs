//! Catalog renderers.
//!
//! Every renderer consumes the category list of one render pass and turns it
//! into artifacts under an [`OutputTarget`](crate::domain::OutputTarget):
//!
//! ```text
//! wd/
//! ├── Start.m3u                 # home category index (nested modes)
//! ├── Start -> E-OurStudio/start  # home link (filesystem mode)
//! └── E-OurStudio/
//!     ├── movies.m3u            # every other category
//!     ├── 1.mp4                 # media downloaded by the provider
//!     └── movies/               # filesystem mode: one dir per category
//!         └── Clip 1.mp4 -> ../1.mp4
//! ```
//!
//! Playlist and HTML artifacts are rebuilt from scratch on each pass.
//! The symlink tree only ever grows; [`janitor`] prunes it.

pub mod filesystem;
pub mod janitor;
pub mod paths;
pub mod playlist;
pub mod sanitize;
pub mod stdout;
pub mod writer;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Category;

pub use filesystem::FilesystemRenderer;
pub use janitor::{clean_symlinks, CleanReport};
pub use paths::{PathPlanner, Plan};
pub use playlist::{PlaylistFormat, PlaylistRenderer};
pub use sanitize::{sanitize, NamePolicy};
pub use stdout::StdoutRenderer;

/// Errors that can occur while writing artifacts
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How categories are laid out on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Home index at the top, everything else under the subdirectory
    #[default]
    Nested,

    /// One leaf-only artifact per category, all beside each other in `wd`
    Flat,
}

/// Counters reported by a render pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Files or directories created/rewritten
    pub artifacts: usize,

    /// Lines, links or sources emitted
    pub entries: usize,

    /// Entries skipped (flat-mode category refs, undownloaded media)
    pub skipped: usize,
}

/// Trait implemented by every output sink
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Human-readable renderer name
    fn name(&self) -> &str;

    /// Render one pass over the catalog
    async fn render(&self, categories: &[Category]) -> Result<RenderSummary, OutputError>;
}
