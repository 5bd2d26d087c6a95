use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::errors::{ConfigPathScope, Error, Result};

#[must_use]
pub fn resolve_semlink_config_path(scope: ConfigPathScope) -> PathBuf {
    match scope {
        ConfigPathScope::User => {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                let trimmed = xdg_config_home.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed).join("semlink").join("config.toml");
                }
            }
            if let Ok(home) = std::env::var("HOME") {
                let trimmed = home.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed)
                        .join(".config")
                        .join("semlink")
                        .join("config.toml");
                }
            }
            PathBuf::from(".semlink").join("config.toml")
        }
        ConfigPathScope::Workspace => PathBuf::from(".semlink").join("config.toml"),
    }
}

/// Candidate config files in lookup order: explicit path, `SEMLINK_CONFIG`,
/// workspace, user.
#[must_use]
pub fn resolve_semlink_config_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(path) = explicit {
        out.push(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var(crate::ENV_SEMLINK_CONFIG) {
        let trimmed = env_path.trim();
        if !trimmed.is_empty() {
            out.push(PathBuf::from(trimmed));
        }
    }
    out.push(resolve_semlink_config_path(ConfigPathScope::Workspace));
    out.push(resolve_semlink_config_path(ConfigPathScope::User));
    out
}

pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
