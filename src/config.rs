//! Configuration for mediatree.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (MEDIATREE_WORK_DIR, MEDIATREE_SAFE_FILENAMES)
//! 3. Config file (.mediatree/config.yaml)
//! 4. Defaults (current directory, Unix file names)
//!
//! Config file discovery:
//! - Searches current directory and parents for .mediatree/config.yaml
//! - Falls back to the user config dir (~/.config/mediatree/config.yaml)
//! - Paths in the config file are relative to the project root (the parent
//!   of .mediatree/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::command::DEFAULT_TIMEOUT;
use crate::output::NamePolicy;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub stream: Option<StreamConfig>,
    #[serde(default)]
    pub provider: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Work directory (relative to the project root)
    pub work_dir: Option<String>,
    /// Strip characters Windows filesystems reject
    pub safe_filenames: Option<bool>,
    /// Prefix category links with their key (filesystem mode)
    pub include_keyname: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    /// Default player command template, `{}` marks the start position
    #[serde(default)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Limit for one run of a catalog or stream source command
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Default work directory
    pub work_dir: PathBuf,
    /// File name policy
    pub name_policy: NamePolicy,
    /// Prefix category links with their key
    pub include_keyname: bool,
    /// Default streaming command template
    pub stream_command: Vec<String>,
    /// Limit for one run of a provider command
    pub provider_timeout: Duration,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            name_policy: NamePolicy::default(),
            include_keyname: false,
            stream_command: Vec::new(),
            provider_timeout: DEFAULT_TIMEOUT,
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".mediatree").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("mediatree").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Parse a boolean environment value ("1", "true", "yes", "on")
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Merge a parsed config file with environment overrides
fn resolve(file: Option<(PathBuf, ConfigFile)>) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    if let Some((config_path, config)) = file {
        // Base directory is the parent of .mediatree/
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        if let Some(ref work_dir) = config.output.work_dir {
            resolved.work_dir = resolve_path(base_dir, work_dir);
        }
        if let Some(safe) = config.output.safe_filenames {
            resolved.name_policy = NamePolicy::from_safe(safe);
        }
        resolved.include_keyname = config.output.include_keyname.unwrap_or(false);
        resolved.stream_command = config.stream.map(|s| s.command).unwrap_or_default();
        if let Some(secs) = config.provider.and_then(|p| p.timeout_seconds) {
            resolved.provider_timeout = Duration::from_secs(secs);
        }
        resolved.config_file = Some(config_path);
    }

    if let Ok(env_wd) = std::env::var("MEDIATREE_WORK_DIR") {
        resolved.work_dir = PathBuf::from(env_wd);
    }
    if let Ok(env_safe) = std::env::var("MEDIATREE_SAFE_FILENAMES") {
        resolved.name_policy = NamePolicy::from_safe(parse_flag(&env_safe));
    }

    resolved
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(file))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, body: &str) -> PathBuf {
        let dir = temp.path().join(".mediatree");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
output:
  work_dir: ../media
  safe_filenames: true
stream:
  command: ["mpv", "--playlist-start={}"]
provider:
  timeout_seconds: 30
"#,
        );

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.output.work_dir, Some("../media".to_string()));
        assert_eq!(config.output.safe_filenames, Some(true));
        assert_eq!(config.output.include_keyname, None);
        assert_eq!(config.stream.unwrap().command, vec!["mpv", "--playlist-start={}"]);
        assert_eq!(config.provider.unwrap().timeout_seconds, Some(30));
    }

    #[test]
    fn test_resolve_relative_to_project_root() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
output:
  work_dir: media
  include_keyname: true
"#,
        );
        let config = load_config_file(&config_path).unwrap();

        let resolved = resolve(Some((config_path.clone(), config)));
        if std::env::var("MEDIATREE_WORK_DIR").is_err() {
            assert_eq!(resolved.work_dir, temp.path().join("media"));
        }
        assert!(resolved.include_keyname);
        assert!(resolved.stream_command.is_empty());
        assert_eq!(resolved.provider_timeout, DEFAULT_TIMEOUT);
        assert_eq!(resolved.config_file, Some(config_path));
    }

    #[test]
    fn test_provider_timeout_from_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
provider:
  timeout_seconds: 45
"#,
        );
        let config = load_config_file(&config_path).unwrap();

        let resolved = resolve(Some((config_path, config)));
        assert_eq!(resolved.provider_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_defaults_without_file() {
        let resolved = resolve(None);
        assert!(resolved.config_file.is_none());
        assert!(!resolved.include_keyname);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn test_resolve_path() {
        let base = PathBuf::from("/home/user/project");
        assert_eq!(
            resolve_path(&base, "media"),
            PathBuf::from("/home/user/project/media")
        );
        assert_eq!(resolve_path(&base, "/srv/media"), PathBuf::from("/srv/media"));
    }
}
