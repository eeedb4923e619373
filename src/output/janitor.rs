//! Pruning of the symlink tree.
//!
//! The filesystem renderer only adds links. Media or categories dropped from
//! the catalog leave broken links behind; [`clean_symlinks`] removes them.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use super::OutputError;

/// What a cleaning pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Links inspected
    pub checked: usize,

    /// Links removed
    pub removed: usize,
}

/// Remove broken (or, with `remove_all`, every) symlink two levels below `dir`
///
/// Only `dir/<subdir>/<link>` is visited. Targets resolve relative to the
/// link's own directory. Anything that is not a link is left alone, and a
/// missing `dir` is an empty pass.
pub async fn clean_symlinks(dir: &Path, remove_all: bool) -> Result<CleanReport, OutputError> {
    let mut report = CleanReport::default();

    if !is_dir(dir).await {
        return Ok(report);
    }

    let mut subdirs = fs::read_dir(dir).await.map_err(|e| OutputError::io(dir, e))?;

    while let Some(subdir) = subdirs
        .next_entry()
        .await
        .map_err(|e| OutputError::io(dir, e))?
    {
        let subdir = subdir.path();
        if !is_dir(&subdir).await {
            continue;
        }

        let mut entries = fs::read_dir(&subdir)
            .await
            .map_err(|e| OutputError::io(&subdir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| OutputError::io(&subdir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| OutputError::io(&entry.path(), e))?;
            if !file_type.is_symlink() {
                continue;
            }

            let link = entry.path();
            report.checked += 1;

            let target = fs::read_link(&link)
                .await
                .map_err(|e| OutputError::io(&link, e))?;
            let source = subdir.join(target);

            let exists = fs::try_exists(&source).await.unwrap_or(false);
            if remove_all || !exists {
                tracing::info!("removing link: {}", entry.file_name().to_string_lossy());
                match fs::remove_file(&link).await {
                    Ok(()) => report.removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(OutputError::io(&link, e)),
                }
            }
        }
    }

    Ok(report)
}

/// Follows symlinks, like a directory test on the path
async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}
