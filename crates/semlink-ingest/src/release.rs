// SPDX-License-Identifier: Apache-2.0

use crate::logging::{event_fields, DiagnosticLog, Stage};
use crate::records::{Adapted, RawRecord, RecordKind};
use crate::registry::InstanceRegistry;
use crate::IngestError;
use semlink_model::{InstanceFragment, InstanceId};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Parsed content of one annotation source, in file then line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBatch {
    pub kind: RecordKind,
    pub fragments: Vec<InstanceFragment>,
    pub rejected: Vec<InstanceId>,
    pub files: usize,
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| IngestError(format!("cannot list {}: {e}", dir.display())))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError(format!("cannot list {}: {e}", dir.display())))?;
        out.push(entry.path());
    }
    out.sort();
    Ok(out)
}

fn files_in_subfolders(
    root: &Path,
    keep: impl Fn(&str) -> bool,
) -> Result<Vec<PathBuf>, IngestError> {
    let mut out = Vec::new();
    for folder in sorted_entries(root)? {
        if !folder.is_dir() {
            continue;
        }
        for file in sorted_entries(&folder)? {
            let matches = file
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(&keep);
            if file.is_file() && matches {
                out.push(file);
            }
        }
    }
    Ok(out)
}

/// Every regular file directly under `dir`.
pub fn verbnet_annotation_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file())
        .collect())
}

/// `.prop` files one level below `root`.
pub fn propbank_release_files(root: &Path) -> Result<Vec<PathBuf>, IngestError> {
    files_in_subfolders(root, |name| name.ends_with(".prop"))
}

/// Files ending in `sense` one level below `root`.
pub fn ontonotes_release_files(root: &Path) -> Result<Vec<PathBuf>, IngestError> {
    files_in_subfolders(root, |name| name.ends_with("sense"))
}

/// Parses every file; the first malformed line aborts the whole batch.
pub fn read_batch(kind: RecordKind, files: &[PathBuf]) -> Result<SourceBatch, IngestError> {
    let mut batch = SourceBatch {
        kind,
        fragments: Vec::new(),
        rejected: Vec::new(),
        files: files.len(),
    };
    for path in files {
        let file = fs::File::open(path)
            .map_err(|e| IngestError(format!("cannot open {}: {e}", path.display())))?;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line =
                line.map_err(|e| IngestError(format!("cannot read {}: {e}", path.display())))?;
            if line.trim().is_empty() {
                continue;
            }
            match RawRecord::new(kind, &line).parse(idx + 1) {
                Ok(Adapted::Fragment(fragment)) => batch.fragments.push(fragment),
                Ok(Adapted::Rejected { id, reason }) => {
                    tracing::debug!(instance = %id, reason, "annotation rejected");
                    batch.rejected.push(id);
                }
                Err(e) => {
                    return Err(IngestError(format!(
                        "{} {}: {e}",
                        kind.as_str(),
                        path.display()
                    )))
                }
            }
        }
    }
    tracing::info!(
        source = kind.as_str(),
        files = batch.files,
        records = batch.fragments.len(),
        rejected = batch.rejected.len(),
        "annotation batch read"
    );
    Ok(batch)
}

/// Builds a registry from a prior merged release.
pub fn load_release(path: &Path, log: &mut DiagnosticLog) -> Result<InstanceRegistry, IngestError> {
    let batch = read_batch(RecordKind::Unified, &[path.to_path_buf()])?;
    let mut registry = InstanceRegistry::new();
    for fragment in batch.fragments {
        registry.upsert(
            fragment,
            RecordKind::Unified.merge_fields(),
            Stage::Bootstrap,
            log,
        );
    }
    log.emit(
        Stage::Bootstrap,
        "bootstrap.loaded",
        event_fields([
            ("path", path.display().to_string()),
            ("instances", registry.len().to_string()),
        ]),
    );
    Ok(registry)
}
