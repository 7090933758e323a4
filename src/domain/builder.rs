//! Tree builder for turning flat parent-pointer records into department trees.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::aggregate::DepartmentTreeAggregate;
use crate::domain::entities::{DepartmentNode, FlatRecord};
use crate::domain::error::{DomainError, DomainResult};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs a forest of department trees from flat records.
///
/// Children keep the iteration order of the input; trees are returned in
/// the input order of their roots.
pub struct TreeBuilder {
    relationship_cache: HashMap<Uuid, Vec<Uuid>>,
    visited_ids: HashSet<Uuid>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            relationship_cache: HashMap::new(),
            visited_ids: HashSet::new(),
        }
    }

    /// Build one aggregate per root record.
    ///
    /// # Errors
    /// * [`DomainError::DuplicateRecord`] if an id occurs twice
    /// * [`DomainError::DanglingParentReference`] if a parent id is not a record
    /// * [`DomainError::CycleDetected`] if records are unreachable from every root
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&mut self, records: &[FlatRecord]) -> TreeResult<Vec<DepartmentTreeAggregate>> {
        // Reset state for a fresh build
        self.relationship_cache.clear();
        self.visited_ids.clear();

        let mut nodes = self.index_records(records)?;

        let roots: Vec<Uuid> = records
            .iter()
            .filter(|record| record.is_root())
            .map(|record| record.id)
            .collect();

        let mut trees = Vec::with_capacity(roots.len());
        for root_id in roots {
            let root = self.assemble(root_id, &mut nodes)?;
            trees.push(DepartmentTreeAggregate::new(root));
        }

        // Anything left over hangs off a parent chain that never reaches a root
        if self.visited_ids.len() < records.len() {
            if let Some(stray) = records.iter().find(|r| !self.visited_ids.contains(&r.id)) {
                return Err(DomainError::CycleDetected(stray.id));
            }
        }

        debug!("built {} trees from {} records", trees.len(), records.len());
        Ok(trees)
    }

    /// Create one childless node per record and fill the relationship cache.
    fn index_records(&mut self, records: &[FlatRecord]) -> TreeResult<HashMap<Uuid, DepartmentNode>> {
        let mut nodes = HashMap::with_capacity(records.len());
        for record in records {
            if nodes.insert(record.id, DepartmentNode::from(record)).is_some() {
                return Err(DomainError::DuplicateRecord(record.id));
            }
        }

        for record in records {
            if let Some(parent_id) = record.parent_id {
                if !nodes.contains_key(&parent_id) {
                    return Err(DomainError::DanglingParentReference {
                        id: record.id,
                        parent_id,
                    });
                }
                self.relationship_cache
                    .entry(parent_id)
                    .or_default()
                    .push(record.id);
            }
        }
        Ok(nodes)
    }

    /// Move the nodes of one tree out of `nodes` and link them bottom-up.
    ///
    /// Walks the relationship cache with an explicit stack in post-order, so a
    /// node's children are complete before it is attached to its own parent.
    fn assemble(
        &mut self,
        root_id: Uuid,
        nodes: &mut HashMap<Uuid, DepartmentNode>,
    ) -> TreeResult<DepartmentNode> {
        let mut stack = vec![(root_id, false)];

        while let Some((current_id, expanded)) = stack.pop() {
            let children = self
                .relationship_cache
                .get(&current_id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            if !expanded {
                // Cycle detection
                if !self.visited_ids.insert(current_id) {
                    return Err(DomainError::CycleDetected(current_id));
                }
                stack.push((current_id, true));
                stack.extend(children.iter().rev().map(|&child| (child, false)));
                continue;
            }

            let mut attached = Vec::with_capacity(children.len());
            for child_id in children {
                let child = nodes
                    .remove(child_id)
                    .ok_or(DomainError::CycleDetected(*child_id))?;
                attached.push(child);
            }
            let node = nodes
                .get_mut(&current_id)
                .ok_or(DomainError::CycleDetected(current_id))?;
            node.children = attached;
        }

        nodes
            .remove(&root_id)
            .ok_or(DomainError::NodeNotFound(root_id))
    }
}

/// Convenience wrapper around [`TreeBuilder::build`].
pub fn build_trees(records: &[FlatRecord]) -> TreeResult<Vec<DepartmentTreeAggregate>> {
    TreeBuilder::new().build(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn given_records_when_indexing_then_caches_children_in_input_order() {
        let records = vec![
            FlatRecord::root(id(1), "Root"),
            FlatRecord::new(id(3), "C", Some(id(1))),
            FlatRecord::new(id(2), "B", Some(id(1))),
        ];
        let mut builder = TreeBuilder::new();

        let nodes = builder.index_records(&records).unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(builder.relationship_cache[&id(1)], vec![id(3), id(2)]);
    }

    #[test]
    fn given_builder_reused_when_building_twice_then_state_is_reset() {
        let mut builder = TreeBuilder::new();
        let first = vec![FlatRecord::root(id(1), "A")];
        let second = vec![FlatRecord::root(id(2), "B")];

        builder.build(&first).unwrap();
        let trees = builder.build(&second).unwrap();

        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].root_id(), id(2));
    }
}
