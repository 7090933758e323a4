//! Department hierarchy service
//!
//! Loads flat records from the store, builds the forest, applies one
//! aggregate operation and writes back the records that changed.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::ChildOrder;
use crate::domain::{
    build_trees, DepartmentNode, DepartmentTreeAggregate, DomainError, FlatRecord,
};
use crate::infrastructure::traits::DepartmentStore;

/// Service for reading and reshaping department trees.
pub struct DepartmentService {
    store: Arc<dyn DepartmentStore>,
    child_order: ChildOrder,
}

impl DepartmentService {
    /// Create a new department service keeping store order for children.
    pub fn new(store: Arc<dyn DepartmentStore>) -> Self {
        Self {
            store,
            child_order: ChildOrder::default(),
        }
    }

    pub fn with_child_order(mut self, child_order: ChildOrder) -> Self {
        self.child_order = child_order;
        self
    }

    /// Fetch all records in the order the builder should see them.
    fn load_records(&self) -> ApplicationResult<Vec<FlatRecord>> {
        let records = self
            .store
            .fetch_all_records()
            .with_store_context("fetch departments", "all")?;
        debug!("load_records: {} records", records.len());

        Ok(match self.child_order {
            ChildOrder::Insertion => records,
            ChildOrder::Title => records
                .into_iter()
                .sorted_by(|a, b| a.title.cmp(&b.title))
                .collect(),
        })
    }

    /// Every tree in the store.
    #[instrument(level = "debug", skip(self))]
    pub fn trees(&self) -> ApplicationResult<Vec<DepartmentTreeAggregate>> {
        let records = self.load_records()?;
        Ok(build_trees(&records)?)
    }

    /// The tree whose root is `root_id`.
    #[instrument(level = "debug", skip(self))]
    pub fn tree(&self, root_id: Uuid) -> ApplicationResult<DepartmentTreeAggregate> {
        self.trees()?
            .into_iter()
            .find(|tree| tree.root_id() == root_id)
            .ok_or(ApplicationError::TreeNotFound(root_id))
    }

    /// The tree that contains department `id` anywhere.
    #[instrument(level = "debug", skip(self))]
    pub fn tree_containing(&self, id: Uuid) -> ApplicationResult<DepartmentTreeAggregate> {
        self.trees()?
            .into_iter()
            .find(|tree| tree.contains(id))
            .ok_or(ApplicationError::Domain(DomainError::NodeNotFound(id)))
    }

    /// One flattened record list per tree.
    pub fn list(&self) -> ApplicationResult<Vec<Vec<FlatRecord>>> {
        Ok(self.trees()?.iter().map(DepartmentTreeAggregate::to_records).collect())
    }

    /// The record of a single department, with its current parent.
    #[instrument(level = "debug", skip(self))]
    pub fn get(&self, id: Uuid) -> ApplicationResult<FlatRecord> {
        let tree = self.tree_containing(id)?;
        record_of(&tree, id)
    }

    /// Start a new tree with a single root department.
    #[instrument(level = "debug", skip(self))]
    pub fn create_root(&self, title: &str) -> ApplicationResult<FlatRecord> {
        let title = validate_title(title)?;
        let record = FlatRecord::root(Uuid::new_v4(), title);
        self.store
            .upsert_record(&record)
            .with_store_context("save department", record.id)?;
        info!("created root department {}", record.id);
        Ok(record)
    }

    /// Create a department below `parent_id`, or a new root when `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, title: &str, parent_id: Option<Uuid>) -> ApplicationResult<FlatRecord> {
        let Some(parent_id) = parent_id else {
            return self.create_root(title);
        };
        let title = validate_title(title)?;

        let mut tree = self.tree_containing(parent_id)?;
        let node = DepartmentNode::with_random_id(title);
        let record = FlatRecord::new(node.id, node.title.clone(), Some(parent_id));
        tree.add_child(parent_id, node)?;

        self.store
            .upsert_record(&record)
            .with_store_context("save department", record.id)?;
        info!("created department {} below {}", record.id, parent_id);
        Ok(record)
    }

    /// Change the title of a department; its position is untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&self, id: Uuid, title: &str) -> ApplicationResult<FlatRecord> {
        let title = validate_title(title)?;
        let mut tree = self.tree_containing(id)?;
        tree.rename(id, title)?;

        let record = record_of(&tree, id)?;
        self.store
            .upsert_record(&record)
            .with_store_context("save department", id)?;
        Ok(record)
    }

    /// Re-parent a department together with its subtree.
    ///
    /// The new parent may live in another tree; the subtree then leaves its
    /// old tree. Only the moved record changes in the store.
    #[instrument(level = "debug", skip(self))]
    pub fn move_department(&self, id: Uuid, new_parent_id: Uuid) -> ApplicationResult<FlatRecord> {
        let mut trees = self.trees()?;
        let source = position_of(&trees, id)?;
        let target = position_of(&trees, new_parent_id)?;

        if source == target {
            trees[source].move_to(id, new_parent_id)?;
        } else {
            if trees[source].root_id() == id {
                return Err(DomainError::ForbiddenMoveRoot(id).into());
            }
            let subtree = trees[source].remove_with_children(id)?;
            trees[target].add_child(new_parent_id, subtree)?;
        }

        let record = record_of(&trees[target], id)?;
        self.store
            .upsert_record(&record)
            .with_store_context("save department", id)?;
        info!("moved department {} below {}", id, new_parent_id);
        Ok(record)
    }

    /// Delete a department that has no children.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: Uuid) -> ApplicationResult<()> {
        let mut tree = self.tree_containing(id)?;
        tree.remove_if_has_no_children(id)?;
        self.store
            .delete_record(id)
            .with_store_context("delete department", id)?;
        info!("deleted department {}", id);
        Ok(())
    }

    /// Delete a department together with all its descendants.
    ///
    /// Records are deleted children first; the removed ids are returned in
    /// that order.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_with_children(&self, id: Uuid) -> ApplicationResult<Vec<Uuid>> {
        let mut tree = self.tree_containing(id)?;
        let removed = DepartmentTreeAggregate::new(tree.remove_with_children(id)?);

        let removed_ids: Vec<Uuid> = removed.iter_postorder().map(|node| node.id).collect();
        for removed_id in &removed_ids {
            self.store
                .delete_record(*removed_id)
                .with_store_context("delete department", removed_id)?;
        }
        info!("deleted department {} with {} descendants", id, removed_ids.len() - 1);
        Ok(removed_ids)
    }
}

fn position_of(trees: &[DepartmentTreeAggregate], id: Uuid) -> ApplicationResult<usize> {
    trees
        .iter()
        .position(|tree| tree.contains(id))
        .ok_or(ApplicationError::Domain(DomainError::NodeNotFound(id)))
}

/// Flat record for `id` as currently placed in `tree`.
fn record_of(tree: &DepartmentTreeAggregate, id: Uuid) -> ApplicationResult<FlatRecord> {
    let node = tree.find(id)?;
    let parent_id = match tree.find_parent(id) {
        Ok(parent) => Some(parent.id),
        Err(DomainError::RootHasNoParent(_)) => None,
        Err(e) => return Err(e.into()),
    };
    Ok(FlatRecord::new(node.id, node.title.clone(), parent_id))
}

/// Trim a title and reject empty ones.
fn validate_title(title: &str) -> ApplicationResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApplicationError::InvalidTitle(title.to_string()));
    }
    Ok(trimmed.to_string())
}
