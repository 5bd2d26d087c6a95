// SPDX-License-Identifier: Apache-2.0

use crate::framenet::{FrameNetIndex, FrameNetSnapshot};
use crate::loader::load_json;
use crate::mappings::{CuratedPbVnMap, RawRoleMap, VnFnFrameMap, VnFnRoleMap};
use crate::ontonotes::{OntoNotesIndex, OntoNotesSnapshot};
use crate::propbank::{PropBankIndex, PropBankSnapshot};
use crate::verbnet::{VerbNetIndex, VerbNetSnapshot};
use crate::ResourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Locations of every resource snapshot a build reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResourcePaths {
    pub verbnet: Option<PathBuf>,
    pub propbank: Option<PathBuf>,
    pub framenet: Option<PathBuf>,
    pub ontonotes: Option<PathBuf>,
    pub external_vn2pb: Option<PathBuf>,
    pub vn_fn: Option<PathBuf>,
    pub vn_fn_roles: Option<PathBuf>,
}

impl ResourcePaths {
    /// Resolves relative entries against `base`.
    #[must_use]
    pub fn rebased(&self, base: &Path) -> Self {
        let join = |p: &Option<PathBuf>| p.as_ref().map(|p| base.join(p));
        Self {
            verbnet: join(&self.verbnet),
            propbank: join(&self.propbank),
            framenet: join(&self.framenet),
            ontonotes: join(&self.ontonotes),
            external_vn2pb: join(&self.external_vn2pb),
            vn_fn: join(&self.vn_fn),
            vn_fn_roles: join(&self.vn_fn_roles),
        }
    }
}

/// Every read-only index a reconciliation run consults.
///
/// Built once before the first pass and only borrowed afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResourceContext {
    pub verbnet: VerbNetIndex,
    pub propbank: PropBankIndex,
    pub framenet: FrameNetIndex,
    pub ontonotes: OntoNotesIndex,
    pub curated_pb_vn: CuratedPbVnMap,
    pub vn_fn_frames: VnFnFrameMap,
    pub vn_fn_roles: VnFnRoleMap,
}

impl ResourceContext {
    /// VerbNet and PropBank are required; the remaining tables default to empty.
    pub fn load(paths: &ResourcePaths) -> Result<Self, ResourceError> {
        let verbnet_path = paths
            .verbnet
            .as_deref()
            .ok_or_else(|| ResourceError("VerbNet snapshot path is required".to_string()))?;
        let propbank_path = paths
            .propbank
            .as_deref()
            .ok_or_else(|| ResourceError("PropBank snapshot path is required".to_string()))?;

        let verbnet = VerbNetIndex::from_snapshot(&load_json::<VerbNetSnapshot>(verbnet_path)?)?;
        let propbank =
            PropBankIndex::from_snapshot(&load_json::<PropBankSnapshot>(propbank_path)?)?;
        let framenet = match optional(paths.framenet.as_deref(), "framenet") {
            Some(path) => FrameNetIndex::from_snapshot(&load_json::<FrameNetSnapshot>(path)?),
            None => FrameNetIndex::default(),
        };
        let ontonotes = match optional(paths.ontonotes.as_deref(), "ontonotes") {
            Some(path) => OntoNotesIndex::from_snapshot(&load_json::<OntoNotesSnapshot>(path)?),
            None => OntoNotesIndex::default(),
        };
        let curated_pb_vn = match optional(paths.external_vn2pb.as_deref(), "external_vn2pb") {
            Some(path) => CuratedPbVnMap::from_raw(&load_json::<BTreeMap<String, Vec<String>>>(path)?)?,
            None => CuratedPbVnMap::default(),
        };
        let vn_fn_frames = match optional(paths.vn_fn.as_deref(), "vn_fn") {
            Some(path) => VnFnFrameMap::load(path)?,
            None => VnFnFrameMap::default(),
        };
        let vn_fn_roles = match optional(paths.vn_fn_roles.as_deref(), "vn_fn_roles") {
            Some(path) => VnFnRoleMap::from_raw(load_json::<RawRoleMap>(path)?),
            None => VnFnRoleMap::default(),
        };

        tracing::info!(
            vn_classes = verbnet.len(),
            pb_rolesets = propbank.len(),
            on_groupings = ontonotes.len(),
            curated_classes = curated_pb_vn.len(),
            "resources loaded"
        );
        Ok(Self {
            verbnet,
            propbank,
            framenet,
            ontonotes,
            curated_pb_vn,
            vn_fn_frames,
            vn_fn_roles,
        })
    }
}

fn optional<'a>(path: Option<&'a Path>, name: &'static str) -> Option<&'a Path> {
    if path.is_none() {
        tracing::warn!(resource = name, "resource not configured; using an empty table");
    }
    path
}
