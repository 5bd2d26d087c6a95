// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod audit;
mod derive;
mod engine;
mod pipeline;
mod validate;

use semlink_ingest::IngestError;
use semlink_resources::ResourceError;
use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "semlink-reconcile";

pub use audit::{
    audit, audit_vn_fn, check_vn_fn_link, combine_vn_fn_maps, CombinedVnFn, FieldAudit,
    ValidationReport, VnFnIssue, VnFnReport,
};
pub use derive::{derive_roleset_class_roles, RolesetClassRoles};
pub use engine::{EnginePolicy, PassReport, ReconcileEngine};
pub use pipeline::{read_sources, run_build, write_summary, BuildPlan, RunSummary};
pub use validate::{check_fn, check_on, check_pb, check_pb_vn, check_vn, PbVnLink};

#[derive(Debug)]
pub struct ReconcileError(pub String);

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ReconcileError {}

impl From<IngestError> for ReconcileError {
    fn from(e: IngestError) -> Self {
        Self(e.0)
    }
}

impl From<ResourceError> for ReconcileError {
    fn from(e: ResourceError) -> Self {
        Self(e.0)
    }
}
