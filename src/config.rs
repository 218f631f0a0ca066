//! Configuration for coursegen paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (COURSEGEN_CONTENT, COURSEGEN_API)
//! 2. Config file (.coursegen/config.yaml)
//! 3. Defaults (content/ and api/ in the current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .coursegen/config.yaml
//! - Paths in the config file are relative to the project root (the parent
//!   of the .coursegen/ directory)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Content tree root (relative to the project root)
    pub content: Option<String>,
    /// Generated API root (relative to the project root)
    pub api: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Content tree root
    pub content: PathBuf,
    /// Generated API root
    pub api: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".coursegen").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let config_file = find_config_file();

    let (content, api) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .coursegen/ (i.e., project root)
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));

        let content = if let Ok(env_content) = std::env::var("COURSEGEN_CONTENT") {
            PathBuf::from(env_content)
        } else if let Some(ref content_path) = config.paths.content {
            resolve_path(base_dir, content_path)
        } else {
            base_dir.join("content")
        };

        let api = if let Ok(env_api) = std::env::var("COURSEGEN_API") {
            PathBuf::from(env_api)
        } else if let Some(ref api_path) = config.paths.api {
            resolve_path(base_dir, api_path)
        } else {
            base_dir.join("api")
        };

        (content, api)
    } else {
        // No config file - use env vars or defaults
        let content = std::env::var("COURSEGEN_CONTENT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cwd.join("content"));

        let api = std::env::var("COURSEGEN_API")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cwd.join("api"));

        (content, api)
    };

    Ok(ResolvedConfig {
        content,
        api,
        config_file,
    })
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

/// Get the content tree root.
pub fn content_dir() -> Result<PathBuf> {
    Ok(config()?.content.clone())
}

/// Get the generated API root.
pub fn api_dir() -> Result<PathBuf> {
    Ok(config()?.api.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_reload_without_config_file_uses_cwd_defaults() {
        // No .coursegen/config.yaml exists above the crate during tests
        let config = reload_config().unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(config.content, cwd.join("content"));
        assert_eq!(config.api, cwd.join("api"));
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let coursegen_dir = temp.path().join(".coursegen");
        std::fs::create_dir_all(&coursegen_dir).unwrap();

        let config_path = coursegen_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  content: ./site-content
  api: ./public/api
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.content, Some("./site-content".to_string()));
        assert_eq!(config.paths.api, Some("./public/api".to_string()));
    }

    #[test]
    fn test_config_file_without_paths_section() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        std::fs::write(&config_path, "version: \"1.0\"\n").unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert!(config.paths.content.is_none());
        assert!(config.paths.api.is_none());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
