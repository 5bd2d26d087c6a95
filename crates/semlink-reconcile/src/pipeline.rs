// SPDX-License-Identifier: Apache-2.0

use crate::engine::{EnginePolicy, PassReport, ReconcileEngine};
use crate::ReconcileError;
use semlink_core::canonical::stable_json_pretty;
use semlink_ingest::{
    counts, event_fields, load_release, ontonotes_release_files, propbank_release_files,
    read_batch, verbnet_annotation_files, write_release, Counts, DiagnosticLog, InstanceRegistry,
    ReconcileEvent, RecordKind, SourceBatch, Stage, WrittenRelease,
};
use semlink_resources::ResourceContext;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs and output of one `build` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub previous_release: Option<PathBuf>,
    pub vn_annotations: Option<PathBuf>,
    pub pb_release: Option<PathBuf>,
    pub on_release: Option<PathBuf>,
    pub output: PathBuf,
    pub policy: EnginePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSummary {
    pub counts: Counts,
    pub passes: Vec<PassReport>,
    pub events: Vec<ReconcileEvent>,
    pub release: WrittenRelease,
}

/// Reads every annotation source named by `plan` before anything is merged.
pub fn read_sources(plan: &BuildPlan) -> Result<Vec<SourceBatch>, ReconcileError> {
    let mut batches = Vec::new();
    if let Some(dir) = &plan.vn_annotations {
        batches.push(read_batch(RecordKind::VerbNet, &verbnet_annotation_files(dir)?)?);
    }
    if let Some(dir) = &plan.pb_release {
        batches.push(read_batch(RecordKind::PropBank, &propbank_release_files(dir)?)?);
    }
    if let Some(dir) = &plan.on_release {
        batches.push(read_batch(RecordKind::OntoNotes, &ontonotes_release_files(dir)?)?);
    }
    Ok(batches)
}

/// Bootstrap, inference passes, bulk ingestion, then the release file.
pub fn run_build(
    ctx: &ResourceContext,
    plan: &BuildPlan,
    log: &mut DiagnosticLog,
) -> Result<(InstanceRegistry, RunSummary), ReconcileError> {
    let mut registry = match &plan.previous_release {
        Some(path) => load_release(path, log)?,
        None => InstanceRegistry::new(),
    };
    let batches = read_sources(plan)?;

    let engine = ReconcileEngine::new(ctx, plan.policy);
    let mut passes = engine.run_inference(&mut registry, log);
    for batch in batches {
        passes.push(engine.ingest(&mut registry, batch, log));
    }

    let release = write_release(&registry, &plan.output)?;
    log.emit(
        Stage::Report,
        "report.written",
        event_fields([
            ("path", release.path.display().to_string()),
            ("lines", release.lines.to_string()),
            ("sha256", release.sha256.clone()),
        ]),
    );
    let summary = RunSummary {
        counts: counts(&registry),
        passes,
        events: log.events().to_vec(),
        release,
    };
    tracing::info!(
        total = summary.counts.total,
        vn = summary.counts.vn,
        pb = summary.counts.pb,
        fn_frames = summary.counts.fn_frames,
        on = summary.counts.on,
        "release written"
    );
    Ok((registry, summary))
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), ReconcileError> {
    let text = stable_json_pretty(summary).map_err(|e| ReconcileError(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ReconcileError(format!("cannot create {}: {e}", parent.display())))?;
    }
    fs::write(path, text)
        .map_err(|e| ReconcileError(format!("cannot write {}: {e}", path.display())))
}
