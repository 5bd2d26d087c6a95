// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod context;
mod framenet;
mod loader;
mod mappings;
mod ontonotes;
mod propbank;
mod verbnet;

use std::fmt::{Display, Formatter};

pub use context::{ResourceContext, ResourcePaths};
pub use framenet::{FrameNetIndex, FrameNetSnapshot, LexicalUnitSnapshot};
pub use loader::load_json;
pub use mappings::{CuratedPbVnMap, VnFnFrameMap, VnFnRoleMap};
pub use ontonotes::{GroupingSnapshot, OntoNotesIndex, OntoNotesSnapshot, SenseGrouping};
pub use propbank::{PropBankIndex, PropBankSnapshot, Roleset, RolesetSnapshot};
pub use verbnet::{ClassNode, ClassSnapshot, VerbNetIndex, VerbNetSnapshot};

pub const CRATE_NAME: &str = "semlink-resources";

#[derive(Debug)]
pub struct ResourceError(pub String);

impl Display for ResourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ResourceError {}
