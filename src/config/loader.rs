use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::AppConfig;

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `$README_GEN_CONFIG` environment variable
/// 3. `$XDG_CONFIG_HOME/readme-gen/config.toml`
/// 4. `~/.config/readme-gen/config.toml`
///
/// Falls back to built-in defaults when no file is found. An explicit path
/// that cannot be read is an error.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };
    let Some(path) = path else {
        tracing::debug!("config: no config file found, using defaults");
        return Ok(AppConfig::default());
    };
    tracing::debug!("config: loading {}", path.display());
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing TOML from {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;
    anyhow::ensure!(
        config.suggestions.max_items > 0,
        "suggestions.max_items must be at least 1"
    );
    anyhow::ensure!(
        !config.service.base_url.trim().is_empty(),
        "service.base_url must not be empty"
    );
    Ok(config)
}

fn find_config() -> Option<PathBuf> {
    // $README_GEN_CONFIG
    if let Ok(path) = std::env::var("README_GEN_CONFIG") {
        let p = PathBuf::from(&path);
        if p.is_file() {
            return Some(p);
        }
    }

    // $XDG_CONFIG_HOME/readme-gen/config.toml
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let p = PathBuf::from(xdg).join("readme-gen/config.toml");
        if p.is_file() {
            return Some(p);
        }
    }

    // ~/.config/readme-gen/config.toml
    if let Some(home) = home_dir() {
        let p = home.join(".config/readme-gen/config.toml");
        if p.is_file() {
            return Some(p);
        }
    }

    None
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
