//! Output path planning and relative addressing.

use std::path::{Component, Path, PathBuf};

use super::{NamePolicy, RenderMode};
use crate::domain::{Category, MediaItem, OutputTarget};

/// Where a category's artifact goes and how its entries are addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Artifact path
    pub output: PathBuf,

    /// Directory prepended to every relative source inside the artifact
    pub prefix: PathBuf,
}

impl Plan {
    /// Source of a link to another category's artifact
    pub fn category_source(&self, key: &str, extension: &str) -> String {
        join_source(&self.prefix, format!("{}{}", key, extension))
    }

    /// Source of a media item: local file if downloaded, else the URL
    pub fn media_source(&self, item: &MediaItem) -> String {
        match item.file_name() {
            Some(file_name) => join_source(&self.prefix, file_name),
            None => item.url.clone(),
        }
    }
}

/// Computes artifact paths for playlist-style renderers
#[derive(Debug, Clone)]
pub struct PathPlanner {
    target: OutputTarget,
    mode: RenderMode,
    policy: NamePolicy,
    extension: String,
}

impl PathPlanner {
    pub fn new(
        target: OutputTarget,
        mode: RenderMode,
        policy: NamePolicy,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            target,
            mode,
            policy,
            extension: extension.into(),
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Resolve the artifact path and source prefix for a category
    pub fn plan(&self, category: &Category) -> Plan {
        let sd = PathBuf::from(&self.target.sd);

        match self.mode {
            RenderMode::Flat => {
                let stem = format!(
                    "{} - {}",
                    category.key,
                    self.policy.sanitize(&category.name)
                );
                Plan {
                    output: self.target.wd.join(self.file_name(&stem)),
                    prefix: sd,
                }
            }
            RenderMode::Nested if category.home => {
                let stem = self.policy.sanitize(&category.name);
                Plan {
                    output: self.target.wd.join(self.file_name(&stem)),
                    prefix: sd,
                }
            }
            RenderMode::Nested => Plan {
                output: self.target.subdir().join(self.file_name(&category.key)),
                prefix: PathBuf::new(),
            },
        }
    }

    fn file_name(&self, stem: &str) -> String {
        let name = format!("{}{}", stem, self.extension);
        debug_assert!(
            is_single_component(&name),
            "generated name escapes its directory: {:?}",
            name
        );
        name
    }
}

/// True if `name` is one plain path component
pub(crate) fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\0')
}

fn join_source(prefix: &Path, name: impl AsRef<Path>) -> String {
    prefix.join(name).to_string_lossy().into_owned()
}

/// Lexical relative path from `base` to `path`
///
/// Both sides are made absolute against the current directory first.
/// Symlinks are not resolved.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(&absolutize(path));
    let base = normalize(&absolutize(base));

    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
