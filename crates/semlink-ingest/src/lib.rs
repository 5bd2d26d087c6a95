// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod logging;
mod records;
mod registry;
mod release;
mod write;

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "semlink-ingest";

pub use logging::{event_fields, DiagnosticLog, ReconcileEvent, Stage};
pub use records::{Adapted, ParseError, ParseErrorKind, RawRecord, RecordKind};
pub use registry::{InstanceRegistry, UpsertOutcome};
pub use release::{
    load_release, ontonotes_release_files, propbank_release_files, read_batch,
    verbnet_annotation_files, SourceBatch,
};
pub use write::{counts, render_line, render_release, write_release, Counts, WrittenRelease};

#[derive(Debug)]
pub struct IngestError(pub String);
impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for IngestError {}
