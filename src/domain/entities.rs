//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A department inside a tree aggregate.
///
/// Children are owned exclusively by their parent node, so a node can only
/// ever appear once in a tree.
///
/// `Clone`, `PartialEq` and `Drop` walk the hierarchy with an explicit stack.
/// The derived `Debug` still recurses once per level; format very deep
/// hierarchies as flattened records instead.
#[derive(Debug)]
pub struct DepartmentNode {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Child departments in insertion order
    pub children: Vec<DepartmentNode>,
}

impl DepartmentNode {
    /// Create a childless node with the given id.
    pub fn new(id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Create a childless node with a fresh random id.
    pub fn with_random_id(title: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4(), title)
    }

    /// Attach `child` and return self, for building fixtures fluently.
    pub fn with_child(mut self, child: DepartmentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Ids of the direct children, in stored order.
    pub fn child_ids(&self) -> Vec<Uuid> {
        self.children.iter().map(|c| c.id).collect()
    }
}

impl Clone for DepartmentNode {
    fn clone(&self) -> Self {
        // post-order: a node is rebuilt once its children sit on top of `built`
        let mut pending = vec![(self, false)];
        let mut built: Vec<DepartmentNode> = Vec::new();

        while let Some((node, expanded)) = pending.pop() {
            if !expanded {
                pending.push((node, true));
                pending.extend(node.children.iter().rev().map(|child| (child, false)));
                continue;
            }
            let children = built.split_off(built.len() - node.children.len());
            built.push(DepartmentNode {
                id: node.id,
                title: node.title.clone(),
                children,
            });
        }
        built.remove(0)
    }
}

impl PartialEq for DepartmentNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((left, right)) = stack.pop() {
            if left.id != right.id
                || left.title != right.title
                || left.children.len() != right.children.len()
            {
                return false;
            }
            stack.extend(left.children.iter().zip(&right.children));
        }
        true
    }
}

impl Eq for DepartmentNode {}

// Iterative drop: the derived one recurses once per level of the hierarchy.
impl Drop for DepartmentNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl fmt::Display for DepartmentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// Relational row describing one department via a self-referential parent pointer.
///
/// `parent_id == None` marks the root of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlatRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
}

impl FlatRecord {
    pub fn new(id: Uuid, title: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            id,
            title: title.into(),
            parent_id,
        }
    }

    pub fn root(id: Uuid, title: impl Into<String>) -> Self {
        Self::new(id, title, None)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl From<&FlatRecord> for DepartmentNode {
    fn from(record: &FlatRecord) -> Self {
        DepartmentNode::new(record.id, record.title.clone())
    }
}
