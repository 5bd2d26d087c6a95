// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::ids::{ClassId, FrameName, GroupId, InstanceId, RolesetId};

const NO_MAPPING: &str = "NF";
const AMBIGUOUS: &str = "IN";

/// FrameNet state of an instance.
///
/// `Unresolved` is the only state inference starts from. `NoMapping` and
/// `Ambiguous` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrameResolution {
    #[default]
    Unresolved,
    NoMapping,
    Ambiguous,
    Resolved(FrameName),
}

impl FrameResolution {
    /// Reads a release column: `None`/`null` are unresolved, `NF`/`IN` are sentinels.
    #[must_use]
    pub fn from_token(raw: &str) -> Self {
        match raw {
            "" | "None" | "null" => Self::Unresolved,
            NO_MAPPING => Self::NoMapping,
            AMBIGUOUS => Self::Ambiguous,
            other => FrameName::parse(other).map_or(Self::Unresolved, Self::Resolved),
        }
    }

    #[must_use]
    pub fn as_token(&self) -> &str {
        match self {
            Self::Unresolved => "None",
            Self::NoMapping => NO_MAPPING,
            Self::Ambiguous => AMBIGUOUS,
            Self::Resolved(frame) => frame.as_str(),
        }
    }

    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::NoMapping | Self::Ambiguous)
    }

    #[must_use]
    pub const fn frame(&self) -> Option<&FrameName> {
        match self {
            Self::Resolved(frame) => Some(frame),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Provenance {
    PriorRelease,
    VerbNet,
    PropBank,
    OntoNotes,
    Inferred,
}

impl Provenance {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriorRelease => "prior_release",
            Self::VerbNet => "vn",
            Self::PropBank => "pb",
            Self::OntoNotes => "on",
            Self::Inferred => "inferred",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeField {
    VnClass,
    PbRoleset,
    FnFrame,
    OnGroup,
    Dependencies,
}

pub const ALL_MERGE_FIELDS: [MergeField; 5] = [
    MergeField::VnClass,
    MergeField::PbRoleset,
    MergeField::FnFrame,
    MergeField::OnGroup,
    MergeField::Dependencies,
];

impl MergeField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VnClass => "vn_class",
            Self::PbRoleset => "pb_roleset",
            Self::FnFrame => "fn_frame",
            Self::OnGroup => "on_group",
            Self::Dependencies => "dependencies",
        }
    }
}

/// The subset of an instance one annotation source can supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceFragment {
    pub id: InstanceId,
    pub verb: String,
    pub vn_class: Option<ClassId>,
    pub pb_roleset: Option<RolesetId>,
    pub fn_frame: FrameResolution,
    pub on_group: Option<GroupId>,
    pub dependencies: Option<Vec<String>>,
    pub provenance: Provenance,
}

impl InstanceFragment {
    #[must_use]
    pub fn new(id: InstanceId, verb: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            id,
            verb: verb.into(),
            vn_class: None,
            pb_roleset: None,
            fn_frame: FrameResolution::Unresolved,
            on_group: None,
            dependencies: None,
            provenance,
        }
    }

    /// Rendered value of `field`, or `None` when the fragment leaves it empty.
    #[must_use]
    pub fn field_token(&self, field: MergeField) -> Option<String> {
        FieldRefs {
            vn_class: self.vn_class.as_ref(),
            pb_roleset: self.pb_roleset.as_ref(),
            fn_frame: &self.fn_frame,
            on_group: self.on_group.as_ref(),
            dependencies: self.dependencies.as_deref(),
        }
        .token(field)
    }
}

/// Borrowed view of the mergeable fields shared by rows and fragments.
struct FieldRefs<'a> {
    vn_class: Option<&'a ClassId>,
    pb_roleset: Option<&'a RolesetId>,
    fn_frame: &'a FrameResolution,
    on_group: Option<&'a GroupId>,
    dependencies: Option<&'a [String]>,
}

impl FieldRefs<'_> {
    fn token(&self, field: MergeField) -> Option<String> {
        match field {
            MergeField::VnClass => self.vn_class.map(ToString::to_string),
            MergeField::PbRoleset => self.pb_roleset.map(ToString::to_string),
            MergeField::FnFrame => {
                (!self.fn_frame.is_unresolved()).then(|| self.fn_frame.as_token().to_string())
            }
            MergeField::OnGroup => self.on_group.map(ToString::to_string),
            MergeField::Dependencies => self
                .dependencies
                .filter(|deps| !deps.is_empty())
                .map(|deps| deps.join(" ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instance {
    pub id: InstanceId,
    pub verb: String,
    pub vn_class: Option<ClassId>,
    pub pb_roleset: Option<RolesetId>,
    pub fn_frame: FrameResolution,
    pub on_group: Option<GroupId>,
    pub dependencies: Option<Vec<String>>,
    pub provenance: Provenance,
}

impl From<InstanceFragment> for Instance {
    fn from(fragment: InstanceFragment) -> Self {
        Self {
            id: fragment.id,
            verb: fragment.verb,
            vn_class: fragment.vn_class,
            pb_roleset: fragment.pb_roleset,
            fn_frame: fragment.fn_frame,
            on_group: fragment.on_group,
            dependencies: fragment.dependencies.filter(|deps| !deps.is_empty()),
            provenance: fragment.provenance,
        }
    }
}

impl Instance {
    #[must_use]
    pub fn field_token(&self, field: MergeField) -> Option<String> {
        FieldRefs {
            vn_class: self.vn_class.as_ref(),
            pb_roleset: self.pb_roleset.as_ref(),
            fn_frame: &self.fn_frame,
            on_group: self.on_group.as_ref(),
            dependencies: self.dependencies.as_deref(),
        }
        .token(field)
    }

    /// Copies `field` from `fragment`. Callers check emptiness first.
    pub fn take_field(&mut self, field: MergeField, fragment: &InstanceFragment) {
        match field {
            MergeField::VnClass => self.vn_class.clone_from(&fragment.vn_class),
            MergeField::PbRoleset => self.pb_roleset.clone_from(&fragment.pb_roleset),
            MergeField::FnFrame => self.fn_frame.clone_from(&fragment.fn_frame),
            MergeField::OnGroup => self.on_group.clone_from(&fragment.on_group),
            MergeField::Dependencies => self.dependencies.clone_from(&fragment.dependencies),
        }
    }
}

/// Removes a trailing `-v` part-of-speech marker from a lemma.
#[must_use]
pub fn strip_verb_suffix(raw: &str) -> &str {
    raw.strip_suffix("-v").unwrap_or(raw)
}
