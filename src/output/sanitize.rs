//! Filename sanitizing for names derived from display names.

use serde::{Deserialize, Serialize};

/// Characters no Unix filesystem accepts in a file name
const UNIX_FORBIDDEN: &[char] = &['/', '\\', '\0'];

/// NTFS/FAT forbidden characters, on top of the Unix set
const PORTABLE_FORBIDDEN: &[char] = &['<', '>', ':', '"', '|', '?', '*', '/', '\\', '\0'];

/// Which characters get stripped from generated file names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Strip path separators and NUL only
    #[default]
    Unix,

    /// Also strip characters Windows filesystems reject
    Portable,
}

impl NamePolicy {
    /// Pick a policy from the "safe filenames" switch
    pub fn from_safe(safe: bool) -> Self {
        if safe {
            Self::Portable
        } else {
            Self::Unix
        }
    }

    pub fn forbidden(self) -> &'static [char] {
        match self {
            Self::Unix => UNIX_FORBIDDEN,
            Self::Portable => PORTABLE_FORBIDDEN,
        }
    }

    /// Remove every forbidden character from `name`
    pub fn sanitize(self, name: &str) -> String {
        let forbidden = self.forbidden();
        name.chars().filter(|c| !forbidden.contains(c)).collect()
    }
}

/// Remove characters unsafe for the target filesystem
pub fn sanitize(name: &str, safe: bool) -> String {
    NamePolicy::from_safe(safe).sanitize(name)
}
