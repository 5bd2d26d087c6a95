#![forbid(unsafe_code)]
//! SemLink instance model.
//!
//! Frame resolution is a closed sum type, so sentinel states can never be
//! confused with a frame that happens to be spelled `NF`:
//!
//! ```
//! use semlink_model::FrameResolution;
//!
//! assert_eq!(FrameResolution::from_token("NF"), FrameResolution::NoMapping);
//! assert!(FrameResolution::from_token("None").is_unresolved());
//! assert_eq!(FrameResolution::from_token("Giving").as_token(), "Giving");
//! ```

mod ids;
mod instance;
mod policy;

pub use ids::{
    normalize_class_label, ClassId, FrameName, GroupId, InstanceId, ParseError, RolesetId,
    ID_MAX_LEN,
};
pub use instance::{
    strip_verb_suffix, FrameResolution, Instance, InstanceFragment, MergeField, Provenance,
    ALL_MERGE_FIELDS,
};
pub use policy::{OntoNotesOrphanPolicy, VerbNetIngestPolicy};

pub const CRATE_NAME: &str = "semlink-model";
