//! Catalog tree handed over by a catalog provider.
//!
//! A render pass receives a flat list of [`Category`] values. Hierarchy is
//! expressed through [`Entry::Category`] references by key, so a category
//! is listed once even when several parents point at it.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A node of the catalog hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable short identifier, used as directory and file stem
    pub key: String,

    /// Display name (not filesystem safe)
    pub name: String,

    /// Root/starting category, indexed at the top of the work dir
    #[serde(default)]
    pub home: bool,

    /// Ordered entries; order is playlist order
    #[serde(default)]
    pub content: Vec<Entry>,
}

impl Category {
    /// Create an empty, non-home category
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            home: false,
            content: Vec::new(),
        }
    }

    /// Mark as a home category
    pub fn home(mut self) -> Self {
        self.home = true;
        self
    }

    /// Append an entry
    pub fn with_entry(mut self, entry: impl Into<Entry>) -> Self {
        self.content.push(entry.into());
        self
    }

    /// Iterate over the media items of this category, in order
    pub fn media(&self) -> impl Iterator<Item = &MediaItem> {
        self.content.iter().filter_map(|entry| match entry {
            Entry::Media(item) => Some(item),
            Entry::Category(_) => None,
        })
    }
}

/// One element of a category's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    /// Link to another category
    Category(CategoryRef),

    /// Playable leaf
    Media(MediaItem),
}

impl From<CategoryRef> for Entry {
    fn from(value: CategoryRef) -> Self {
        Entry::Category(value)
    }
}

impl From<MediaItem> for Entry {
    fn from(value: MediaItem) -> Self {
        Entry::Media(value)
    }
}

/// Reference to a child category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub key: String,
    pub name: String,
}

impl CategoryRef {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// A media leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Display name
    pub name: String,

    /// Remote source, authoritative when `file` is absent
    pub url: String,

    /// Local copy, present only if the provider already downloaded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl MediaItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            file: None,
        }
    }

    /// Attach a downloaded local file
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// File name of the local copy, if any
    pub fn file_name(&self) -> Option<&OsStr> {
        self.file.as_deref().and_then(Path::file_name)
    }

    /// Extension of the local copy including the dot, or an empty string
    pub fn file_extension(&self) -> String {
        self.file
            .as_deref()
            .and_then(Path::extension)
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_wire_format() {
        let json = r#"{
            "key": "start",
            "name": "Start",
            "home": true,
            "content": [
                {"type": "category", "key": "movies", "name": "Movies"},
                {"type": "media", "name": "Clip 1", "url": "http://x/1.mp4"},
                {"type": "media", "name": "Clip 2", "url": "http://x/2.mp4", "file": "/data/E-OurStudio/2.mp4"}
            ]
        }"#;

        let category: Category = serde_json::from_str(json).unwrap();
        assert!(category.home);
        assert_eq!(category.content.len(), 3);
        assert_eq!(
            category.content[0],
            Entry::Category(CategoryRef::new("movies", "Movies"))
        );
        assert_eq!(category.media().count(), 2);
        assert_eq!(category.media().nth(1).unwrap().file_name(), Some(OsStr::new("2.mp4")));
    }

    #[test]
    fn test_home_defaults_to_false() {
        let category: Category =
            serde_json::from_str(r#"{"key": "k", "name": "N"}"#).unwrap();
        assert!(!category.home);
        assert!(category.content.is_empty());
    }

    #[test]
    fn test_file_extension() {
        let item = MediaItem::new("Clip", "http://x/1.mp4").with_file("/d/1.mp4");
        assert_eq!(item.file_extension(), ".mp4");

        let remote = MediaItem::new("Clip", "http://x/1.mp4");
        assert_eq!(remote.file_extension(), "");
        assert_eq!(remote.file_name(), None);
    }
}
