//! Symlink tree renderer.
//!
//! Every category becomes a directory `wd/sd/<key>`. Child categories are
//! linked as `../<key>`, downloaded media as `../<file name>` (media files
//! live in `wd/sd`, shared between categories). Home categories also get
//! a top level link `wd/<name> -> sd/<key>`.
//!
//! Links are relative, so the tree survives moving `wd`. Existing links
//! are left alone; nothing is ever deleted here.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use super::{NamePolicy, OutputError, RenderSummary, Renderer};
use crate::domain::{Category, Entry, OutputTarget};

#[derive(Debug, Clone)]
pub struct FilesystemRenderer {
    target: OutputTarget,
    policy: NamePolicy,
    include_keyname: bool,
}

impl FilesystemRenderer {
    pub fn new(target: OutputTarget, policy: NamePolicy) -> Self {
        Self {
            target,
            policy,
            include_keyname: false,
        }
    }

    /// Prefix category link names with their key
    pub fn include_keyname(mut self, include: bool) -> Self {
        self.include_keyname = include;
        self
    }

    fn category_link_name(&self, key: &str, name: &str) -> String {
        if self.include_keyname {
            format!("{} - {}", key, self.policy.sanitize(name))
        } else {
            self.policy.sanitize(name)
        }
    }
}

#[async_trait]
impl Renderer for FilesystemRenderer {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn render(&self, categories: &[Category]) -> Result<RenderSummary, OutputError> {
        let sd = self.target.subdir();
        let mut summary = RenderSummary::default();

        for category in categories {
            let output_dir = sd.join(&category.key);
            create_dir(&output_dir).await?;
            summary.artifacts += 1;

            if category.home {
                let link = self.target.wd.join(self.policy.sanitize(&category.name));
                let source = Path::new(&self.target.sd).join(&category.key);
                if symlink(&source, &link).await? {
                    summary.entries += 1;
                }
            }

            for entry in &category.content {
                let (source, link) = match entry {
                    Entry::Category(child) => {
                        create_dir(&sd.join(&child.key)).await?;
                        (
                            Path::new("..").join(&child.key),
                            output_dir.join(self.category_link_name(&child.key, &child.name)),
                        )
                    }
                    Entry::Media(item) => {
                        let Some(file_name) = item.file_name() else {
                            // Nothing downloaded, nothing to link to
                            summary.skipped += 1;
                            continue;
                        };
                        let link_name = self
                            .policy
                            .sanitize(&format!("{}{}", item.name, item.file_extension()));
                        (Path::new("..").join(file_name), output_dir.join(link_name))
                    }
                };

                if symlink(&source, &link).await? {
                    summary.entries += 1;
                }
            }
        }

        Ok(summary)
    }
}

async fn create_dir(path: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| OutputError::io(path, e))
}

/// Create `link -> source`; an existing entry at `link` counts as done
///
/// Returns `true` if a new link was created.
async fn symlink(source: &Path, link: &Path) -> Result<bool, OutputError> {
    match fs::symlink(source, link).await {
        Ok(()) => {
            tracing::debug!("Linked {} -> {}", link.display(), source.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!("Link already present: {}", link.display());
            Ok(false)
        }
        Err(e) => Err(OutputError::io(link, e)),
    }
}
