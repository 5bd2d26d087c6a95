// SPDX-License-Identifier: Apache-2.0

use semlink_core::{load_toml_file, resolve_semlink_config_candidates, Error};
use semlink_model::OntoNotesOrphanPolicy;
use semlink_resources::ResourcePaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AnnotationPaths {
    pub previous_release: Option<PathBuf>,
    pub vn_annotations: Option<PathBuf>,
    pub pb_release: Option<PathBuf>,
    pub on_release: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputPaths {
    pub path: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PolicyConfig {
    pub ontonotes_orphans: OntoNotesOrphanPolicy,
    pub verbnet_ingest_repair: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ontonotes_orphans: OntoNotesOrphanPolicy::default(),
            verbnet_ingest_repair: true,
        }
    }
}

/// Contents of a `semlink` config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SemlinkConfig {
    pub resources: ResourcePaths,
    pub annotations: AnnotationPaths,
    pub output: OutputPaths,
    pub policy: PolicyConfig,
}

impl SemlinkConfig {
    /// Relative paths in a config file are relative to the file itself.
    #[must_use]
    pub fn rebased(&self, base: &Path) -> Self {
        let join = |p: &Option<PathBuf>| p.as_ref().map(|p| base.join(p));
        Self {
            resources: self.resources.rebased(base),
            annotations: AnnotationPaths {
                previous_release: join(&self.annotations.previous_release),
                vn_annotations: join(&self.annotations.vn_annotations),
                pb_release: join(&self.annotations.pb_release),
                on_release: join(&self.annotations.on_release),
            },
            output: OutputPaths {
                path: join(&self.output.path),
                summary: join(&self.output.summary),
            },
            policy: self.policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedConfig {
    pub source: Option<PathBuf>,
    pub config: SemlinkConfig,
}

/// First existing candidate wins; built-in defaults when none exists.
///
/// An explicit `--config` path that does not exist is an error rather than
/// a silent fall-through.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, Error> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "config file not found".to_string(),
            });
        }
    }
    for candidate in resolve_semlink_config_candidates(explicit) {
        if !candidate.is_file() {
            continue;
        }
        let raw: SemlinkConfig = load_toml_file(&candidate)?;
        let base = candidate
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        tracing::debug!(path = %candidate.display(), "config loaded");
        return Ok(LoadedConfig {
            config: raw.rebased(&base),
            source: Some(candidate),
        });
    }
    Ok(LoadedConfig {
        source: None,
        config: SemlinkConfig::default(),
    })
}
