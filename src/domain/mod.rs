//! Domain types for mediatree.
//!
//! - Category tree: categories, entries, media items
//! - Output target: work dir and subdirectory namespace

pub mod category;
pub mod target;

pub use category::{Category, CategoryRef, Entry, MediaItem};
pub use target::OutputTarget;
