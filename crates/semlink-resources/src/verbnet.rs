// SPDX-License-Identifier: Apache-2.0

use crate::ResourceError;
use semlink_model::{normalize_class_label, ClassId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VerbNetSnapshot {
    pub classes: Vec<ClassSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClassSnapshot {
    pub id: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub subclasses: Vec<ClassSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub id: ClassId,
    pub members: BTreeSet<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// VerbNet class hierarchy stored as an arena.
///
/// Subclass enumeration is a stable pre-order: a class, then each of its
/// subclasses in declaration order, each fully expanded before the next.
#[derive(Debug, Clone, Default)]
pub struct VerbNetIndex {
    nodes: Vec<ClassNode>,
    by_id: HashMap<ClassId, usize>,
}

impl VerbNetIndex {
    pub fn from_snapshot(snapshot: &VerbNetSnapshot) -> Result<Self, ResourceError> {
        let mut index = Self::default();
        let mut pending: Vec<(Option<usize>, &ClassSnapshot)> =
            snapshot.classes.iter().rev().map(|c| (None, c)).collect();
        while let Some((parent, class)) = pending.pop() {
            let id = normalize_class_label(&class.id).ok_or_else(|| {
                ResourceError(format!("VerbNet class id is not numerical: {}", class.id))
            })?;
            let slot = index.add_class(parent, id, class.members.iter().cloned())?;
            pending.extend(class.subclasses.iter().rev().map(|c| (Some(slot), c)));
        }
        Ok(index)
    }

    /// Appends a class under `parent` and returns its arena slot.
    pub fn add_class(
        &mut self,
        parent: Option<usize>,
        id: ClassId,
        members: impl IntoIterator<Item = String>,
    ) -> Result<usize, ResourceError> {
        if self.by_id.contains_key(&id) {
            return Err(ResourceError(format!("duplicate VerbNet class id: {id}")));
        }
        if let Some(p) = parent {
            if p >= self.nodes.len() {
                return Err(ResourceError(format!(
                    "VerbNet parent slot {p} out of range for class {id}"
                )));
            }
        }
        let slot = self.nodes.len();
        self.nodes.push(ClassNode {
            id: id.clone(),
            members: members.into_iter().collect(),
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(slot);
        }
        self.by_id.insert(id, slot);
        Ok(slot)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ClassNode> {
        let id = ClassId::parse(id).ok()?;
        self.by_id.get(&id).map(|slot| &self.nodes[*slot])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn is_direct_member(&self, id: &str, verb: &str) -> bool {
        self.get(id).is_some_and(|node| node.members.contains(verb))
    }

    /// The class itself followed by every transitive subclass, in stable pre-order.
    #[must_use]
    pub fn walk_preorder(&self, id: &str) -> Vec<&ClassNode> {
        let Some(root) = ClassId::parse(id).ok().and_then(|c| self.by_id.get(&c).copied()) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(slot) = stack.pop() {
            let node = &self.nodes[slot];
            out.push(node);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    #[must_use]
    pub fn get_all_subclasses(&self, id: &str) -> Vec<&ClassNode> {
        self.walk_preorder(id).into_iter().skip(1).collect()
    }

    #[must_use]
    pub fn get_all_members(&self) -> BTreeSet<&str> {
        self.nodes
            .iter()
            .flat_map(|node| node.members.iter().map(String::as_str))
            .collect()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassNode> {
        self.nodes.iter()
    }
}
