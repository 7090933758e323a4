//! Department tree aggregate: a rooted tree of owned nodes.

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::entities::DepartmentNode;
use crate::domain::error::{DomainError, DomainResult};

/// Consistency boundary around one department tree.
///
/// The root is owned by the aggregate and every other node is owned by its
/// parent's `children`, so sharing and cycles cannot be expressed. Ids are
/// unique within the aggregate as long as callers of [`add_child`] respect its
/// precondition.
///
/// [`add_child`]: DepartmentTreeAggregate::add_child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentTreeAggregate {
    root: DepartmentNode,
}

impl DepartmentTreeAggregate {
    pub fn new(root: DepartmentNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &DepartmentNode {
        &self.root
    }

    pub fn root_id(&self) -> Uuid {
        self.root.id
    }

    /// Depth-first pre-order traversal, strictly left-to-right among siblings.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(&self.root)
    }

    /// Depth-first post-order traversal: every node after all of its descendants.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(&self.root)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.iter().any(|node| node.id == id)
    }

    /// Total node count including the root.
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, id: Uuid) -> DomainResult<&DepartmentNode> {
        self.iter()
            .find(|node| node.id == id)
            .ok_or(DomainError::NodeNotFound(id))
    }

    /// Node whose `children` directly contain `id`.
    ///
    /// The root has no parent and yields [`DomainError::RootHasNoParent`].
    #[instrument(level = "trace", skip(self))]
    pub fn find_parent(&self, id: Uuid) -> DomainResult<&DepartmentNode> {
        let path = self.locate(id).ok_or(DomainError::NodeNotFound(id))?;
        match path.split_last() {
            Some((_, parent_path)) => Ok(self.node_at(parent_path)),
            None => Err(DomainError::RootHasNoParent(id)),
        }
    }

    /// Number of levels, counting the root as level 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(&self.root, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        max_depth
    }

    /// Ids of all nodes without children, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<Uuid> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.id)
            .collect()
    }

    /// Append `child` (with any subtree it carries) to the node `parent_id`.
    ///
    /// Precondition: no id inside `child` exists in this or any other
    /// aggregate. It is not re-checked here.
    #[instrument(level = "debug", skip(self, child), fields(child_id = %child.id))]
    pub fn add_child(&mut self, parent_id: Uuid, child: DepartmentNode) -> DomainResult<()> {
        let parent = self.find_mut(parent_id)?;
        parent.children.push(child);
        Ok(())
    }

    #[instrument(level = "debug", skip(self, title))]
    pub fn rename(&mut self, id: Uuid, title: impl Into<String>) -> DomainResult<()> {
        let node = self.find_mut(id)?;
        node.title = title.into();
        Ok(())
    }

    /// Unlink a leaf department from its parent.
    ///
    /// Fails without touching the tree if `id` is absent, is the root, or
    /// still has children.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_if_has_no_children(&mut self, id: Uuid) -> DomainResult<()> {
        let (parent_path, position) = self.removable_position(id)?;
        if !self.node_at(&parent_path).children[position].is_leaf() {
            return Err(DomainError::ForbiddenDeleteWithChildren(id));
        }
        self.detach(&parent_path, position);
        Ok(())
    }

    /// Unlink the subtree rooted at `id` and hand it back to the caller.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_with_children(&mut self, id: Uuid) -> DomainResult<DepartmentNode> {
        let (parent_path, position) = self.removable_position(id)?;
        Ok(self.detach(&parent_path, position))
    }

    /// Re-attach `id` with its whole subtree as the last child of `new_parent_id`.
    ///
    /// Fails without touching the tree if either id is absent, `id` is the
    /// root, or `new_parent_id` lies inside the subtree of `id`.
    #[instrument(level = "debug", skip(self))]
    pub fn move_to(&mut self, id: Uuid, new_parent_id: Uuid) -> DomainResult<()> {
        let source = self.locate(id).ok_or(DomainError::NodeNotFound(id))?;
        let mut target = self
            .locate(new_parent_id)
            .ok_or(DomainError::NodeNotFound(new_parent_id))?;
        let Some((&position, parent_path)) = source.split_last() else {
            return Err(DomainError::ForbiddenMoveRoot(id));
        };
        if target.starts_with(&source) {
            return Err(DomainError::ForbiddenMoveIntoSubtree { id, new_parent_id });
        }

        // detaching shifts later siblings of `id` one slot to the left
        let level = parent_path.len();
        if target.len() > level && target[..level] == *parent_path && target[level] > position {
            target[level] -= 1;
        }

        let node = self.detach(parent_path, position);
        self.node_at_mut(&target).children.push(node);
        Ok(())
    }

    /// Parent path and child position of a node that may be removed.
    ///
    /// Root-ness is checked before anything else, so an empty root is refused too.
    fn removable_position(&self, id: Uuid) -> DomainResult<(Vec<usize>, usize)> {
        let mut path = self.locate(id).ok_or(DomainError::NodeNotFound(id))?;
        let position = path.pop().ok_or(DomainError::ForbiddenDeleteRoot(id))?;
        Ok((path, position))
    }

    fn find_mut(&mut self, id: Uuid) -> DomainResult<&mut DepartmentNode> {
        let path = self.locate(id).ok_or(DomainError::NodeNotFound(id))?;
        Ok(self.node_at_mut(&path))
    }

    /// Child positions leading from the root to `id`; empty for the root itself.
    fn locate(&self, id: Uuid) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut stack = vec![(&self.root, 0usize, 0usize)];

        while let Some((node, depth, position)) = stack.pop() {
            if depth > 0 {
                // everything above `depth - 1` belongs to an already finished sibling subtree
                path.truncate(depth - 1);
                path.push(position);
            }
            if node.id == id {
                return Some(path);
            }
            for (position, child) in node.children.iter().enumerate().rev() {
                stack.push((child, depth + 1, position));
            }
        }
        None
    }

    fn node_at(&self, path: &[usize]) -> &DepartmentNode {
        path.iter().fold(&self.root, |node, &i| &node.children[i])
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut DepartmentNode {
        path.iter()
            .fold(&mut self.root, |node, &i| &mut node.children[i])
    }

    fn detach(&mut self, parent_path: &[usize], position: usize) -> DepartmentNode {
        let parent = self.node_at_mut(parent_path);
        let removed = parent.children.remove(position);
        debug!("detached {} from {}", removed.id, parent.id);
        removed
    }
}

impl<'a> IntoIterator for &'a DepartmentTreeAggregate {
    type Item = &'a DepartmentNode;
    type IntoIter = TreeIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct TreeIterator<'a> {
    stack: Vec<&'a DepartmentNode>,
}

impl<'a> TreeIterator<'a> {
    fn new(root: &'a DepartmentNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = &'a DepartmentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

pub struct PostOrderIterator<'a> {
    stack: Vec<(&'a DepartmentNode, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(root: &'a DepartmentNode) -> Self {
        Self {
            stack: vec![(root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = &'a DepartmentNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, visited)) = self.stack.pop() {
            if visited {
                return Some(node);
            }
            self.stack.push((node, true));
            for child in node.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    /// 1 -> [2 -> [4, 5], 3]
    fn sample() -> DepartmentTreeAggregate {
        DepartmentTreeAggregate::new(
            DepartmentNode::new(id(1), "Root")
                .with_child(
                    DepartmentNode::new(id(2), "Eng")
                        .with_child(DepartmentNode::new(id(4), "Backend"))
                        .with_child(DepartmentNode::new(id(5), "Frontend")),
                )
                .with_child(DepartmentNode::new(id(3), "Sales")),
        )
    }

    #[test]
    fn given_tree_when_locating_nodes_then_returns_child_positions() {
        let tree = sample();

        assert_eq!(tree.locate(id(1)), Some(vec![]));
        assert_eq!(tree.locate(id(5)), Some(vec![0, 1]));
        assert_eq!(tree.locate(id(3)), Some(vec![1]));
        assert_eq!(tree.locate(id(99)), None);
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_children_come_first() {
        let tree = sample();

        let order: Vec<Uuid> = tree.iter_postorder().map(|n| n.id).collect();

        assert_eq!(order, vec![id(4), id(5), id(2), id(3), id(1)]);
    }

    #[test]
    fn given_tree_when_computing_depth_and_leaves_then_matches_shape() {
        let tree = sample();

        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_ids(), vec![id(4), id(5), id(3)]);
    }

    #[test]
    fn given_target_after_moved_sibling_when_moving_then_follows_shifted_position() {
        let mut tree = sample();

        // Eng sits left of Sales, so Sales moves one slot left once Eng is detached
        tree.move_to(id(2), id(3)).unwrap();

        assert_eq!(tree.root().child_ids(), vec![id(3)]);
        assert_eq!(tree.find_parent(id(2)).unwrap().id, id(3));
        assert_eq!(tree.locate(id(5)), Some(vec![0, 0, 1]));
    }

    #[test]
    fn given_target_before_moved_node_when_moving_then_keeps_position() {
        let mut tree = sample();

        tree.move_to(id(3), id(4)).unwrap();

        assert_eq!(tree.locate(id(3)), Some(vec![0, 0, 0]));
        assert_eq!(tree.size(), 5);
    }
}
