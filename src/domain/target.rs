//! Output target: where a render pass writes.

use std::path::PathBuf;

/// Work directory plus the namespacing subdirectory (e.g. `E-OurStudio`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Work directory, root of every generated path
    pub wd: PathBuf,

    /// Subdirectory name inside `wd`
    pub sd: String,
}

impl OutputTarget {
    pub fn new(wd: impl Into<PathBuf>, sd: impl Into<String>) -> Self {
        Self {
            wd: wd.into(),
            sd: sd.into(),
        }
    }

    /// `wd/sd`
    pub fn subdir(&self) -> PathBuf {
        self.wd.join(&self.sd)
    }
}
