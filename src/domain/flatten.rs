//! Tree flattener: the inverse of the tree builder.

use tracing::instrument;
use uuid::Uuid;

use crate::domain::aggregate::DepartmentTreeAggregate;
use crate::domain::entities::{DepartmentNode, FlatRecord};

/// Serialize a tree into flat records in depth-first pre-order.
///
/// The root carries `parent_id = None`; every other record carries the id of
/// the node whose children were being walked when it was emitted. Parents
/// always precede their children and the output has exactly `size()` entries.
#[instrument(level = "debug", skip(tree), fields(root = %tree.root_id()))]
pub fn flatten(tree: &DepartmentTreeAggregate) -> Vec<FlatRecord> {
    flatten_subtree(tree.root(), None)
}

/// Same as [`flatten`] for a detached subtree whose top node hangs below `parent_id`.
pub fn flatten_subtree(node: &DepartmentNode, parent_id: Option<Uuid>) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    let mut stack = vec![(node, parent_id)];

    while let Some((current, parent_id)) = stack.pop() {
        records.push(FlatRecord::new(current.id, current.title.clone(), parent_id));
        stack.extend(
            current
                .children
                .iter()
                .rev()
                .map(|child| (child, Some(current.id))),
        );
    }
    records
}

impl DepartmentTreeAggregate {
    pub fn to_records(&self) -> Vec<FlatRecord> {
        flatten(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_detached_subtree_when_flattening_then_top_keeps_given_parent() {
        let parent = Uuid::new_v4();
        let child = DepartmentNode::with_random_id("Leaf");
        let top = DepartmentNode::with_random_id("Top").with_child(child.clone());

        let records = flatten_subtree(&top, Some(parent));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].parent_id, Some(parent));
        assert_eq!(records[1], FlatRecord::new(child.id, "Leaf", Some(top.id)));
    }
}
