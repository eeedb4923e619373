//! mediatree - Render media catalogs into durable artifacts
//!
//! Turns a category tree handed over by a catalog provider into plain
//! listings, M3U playlists, HTML link pages or a symlink directory tree,
//! and drives a poll loop that streams newly discovered media to a player.
//!
//! # Modules
//!
//! - `adapters`: Catalog providers (JSON file, external command)
//! - `domain`: Data structures (Category, Entry, OutputTarget)
//! - `output`: Renderers, path planning, incremental writes, symlink pruning
//! - `stream`: Streaming driver and external command runner
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Nested playlists under ./E-OurStudio, index in .
//! mediatree render --mode m3u --subdir E-OurStudio --catalog catalog.json .
//!
//! # Stream to mpv, seeking to the provider's start position
//! mediatree stream --source-cmd ./next-batch -- mpv --playlist-start={}
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod output;
pub mod stream;

// Re-export main types at crate root for convenience
pub use adapters::{CatalogProvider, StreamSource};
pub use domain::{Category, CategoryRef, Entry, MediaItem, OutputTarget};
pub use output::{
    clean_symlinks, sanitize, FilesystemRenderer, NamePolicy, OutputError, PlaylistRenderer,
    RenderMode, Renderer, StdoutRenderer,
};
pub use stream::{CommandTemplate, StreamBatch, StreamDriver, StreamError};
