//! Tree rendering for terminal output.

use termtree::Tree;

use crate::domain::aggregate::DepartmentTreeAggregate;
use crate::domain::entities::DepartmentNode;

/// Levels rendered below and including the root before output is cut off.
pub const MAX_RENDER_DEPTH: usize = 128;

pub trait TreeNodeConvert {
    /// Render at most [`MAX_RENDER_DEPTH`] levels.
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_limited(MAX_RENDER_DEPTH)
    }

    /// Render at most `max_depth` levels; deeper departments are summarized
    /// as a single "more below" leaf under the last rendered level.
    fn to_tree_string_limited(&self, max_depth: usize) -> Tree<String>;
}

impl TreeNodeConvert for DepartmentNode {
    fn to_tree_string_limited(&self, max_depth: usize) -> Tree<String> {
        let tree = Tree::new(self.to_string());
        if self.is_leaf() {
            return tree;
        }
        if max_depth <= 1 {
            let hidden = descendant_count(self);
            return tree.with_leaves([Tree::new(format!("… {hidden} more below"))]);
        }
        // recursion is bounded by max_depth
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string_limited(max_depth - 1))
            .collect();
        tree.with_leaves(leaves)
    }
}

impl TreeNodeConvert for DepartmentTreeAggregate {
    fn to_tree_string_limited(&self, max_depth: usize) -> Tree<String> {
        self.root().to_tree_string_limited(max_depth)
    }
}

fn descendant_count(node: &DepartmentNode) -> usize {
    let mut count = 0;
    let mut stack: Vec<&DepartmentNode> = node.children.iter().collect();
    while let Some(current) = stack.pop() {
        count += 1;
        stack.extend(current.children.iter());
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chain(levels: u128) -> DepartmentNode {
        let mut node = DepartmentNode::new(Uuid::from_u128(levels - 1), format!("L{}", levels - 1));
        for n in (0..levels - 1).rev() {
            node = DepartmentNode::new(Uuid::from_u128(n), format!("L{n}")).with_child(node);
        }
        node
    }

    #[test]
    fn given_tree_when_rendering_then_lists_every_title() {
        let tree = DepartmentTreeAggregate::new(
            DepartmentNode::new(Uuid::nil(), "Root")
                .with_child(DepartmentNode::with_random_id("Eng"))
                .with_child(DepartmentNode::with_random_id("Sales")),
        );

        let rendered = tree.to_tree_string().to_string();

        assert!(rendered.starts_with("Root"));
        assert!(rendered.contains("Eng"));
        assert!(rendered.contains("Sales"));
        assert!(!rendered.contains("more below"));
    }

    #[test]
    fn given_shallow_limit_when_rendering_then_summarizes_hidden_levels() {
        let tree = DepartmentTreeAggregate::new(chain(5));

        let rendered = tree.to_tree_string_limited(2).to_string();

        assert!(rendered.contains("L0"));
        assert!(rendered.contains("L1"));
        assert!(!rendered.contains("L2"));
        assert!(rendered.contains("… 3 more below"));
    }

    #[test]
    fn given_deep_chain_when_rendering_then_output_is_capped() {
        // Arrange
        let levels = 100_000u128;
        let tree = DepartmentTreeAggregate::new(chain(levels));

        // Act
        let rendered = tree.to_tree_string().to_string();

        // Assert
        assert_eq!(rendered.lines().count(), MAX_RENDER_DEPTH + 1);
        let hidden = levels as usize - MAX_RENDER_DEPTH;
        assert!(rendered.contains(&format!("… {hidden} more below")));
    }
}
