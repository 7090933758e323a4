//! Tests for the tree flattener and the build/flatten round trip

use std::collections::{HashMap, HashSet};

use rstest::rstest;
use uuid::Uuid;

use orgtree::domain::{build_trees, flatten, DepartmentNode, DepartmentTreeAggregate, FlatRecord};
use orgtree::util::testing::{fixture_id as id, init_test_setup, sample_records};

fn as_set(records: &[FlatRecord]) -> HashSet<FlatRecord> {
    records.iter().cloned().collect()
}

fn position(records: &[FlatRecord], node_id: Uuid) -> usize {
    records
        .iter()
        .position(|r| r.id == node_id)
        .expect("record present")
}

#[test]
fn given_sample_tree_when_flattening_then_emits_preorder_with_parents() {
    // Arrange
    init_test_setup();
    let tree = build_trees(&sample_records()).unwrap().remove(0);

    // Act
    let records = flatten(&tree);

    // Assert
    assert_eq!(
        records,
        vec![
            FlatRecord::root(id(1), "Root"),
            FlatRecord::new(id(2), "Eng", Some(id(1))),
            FlatRecord::new(id(4), "Backend", Some(id(2))),
            FlatRecord::new(id(3), "Sales", Some(id(1))),
        ]
    );
}

#[test]
fn given_tree_when_flattening_then_parents_precede_children_and_length_matches() {
    // Arrange
    let root = DepartmentNode::new(id(1), "Root")
        .with_child(
            DepartmentNode::new(id(2), "A")
                .with_child(DepartmentNode::new(id(5), "A1"))
                .with_child(DepartmentNode::new(id(6), "A2").with_child(DepartmentNode::new(id(8), "A2x"))),
        )
        .with_child(DepartmentNode::new(id(3), "B"))
        .with_child(DepartmentNode::new(id(4), "C").with_child(DepartmentNode::new(id(7), "C1")));
    let tree = DepartmentTreeAggregate::new(root);

    // Act
    let records = tree.to_records();

    // Assert
    assert_eq!(records.len(), tree.size());
    for record in &records {
        if let Some(parent) = record.parent_id {
            assert!(position(&records, parent) < position(&records, record.id));
        }
    }
}

#[rstest]
#[case::given_order(vec![0, 1, 2, 3])]
#[case::reversed(vec![3, 2, 1, 0])]
#[case::children_first(vec![3, 1, 2, 0])]
#[case::interleaved(vec![2, 0, 3, 1])]
fn given_any_input_order_when_round_tripping_then_preserves_records(#[case] order: Vec<usize>) {
    // Arrange
    let base = sample_records();
    let shuffled: Vec<FlatRecord> = order.iter().map(|&i| base[i].clone()).collect();

    // Act
    let trees = build_trees(&shuffled).unwrap();
    let flattened: Vec<FlatRecord> = trees.iter().flat_map(flatten).collect();

    // Assert - same (id, title, parent) triples regardless of order
    assert_eq!(as_set(&flattened), as_set(&base));
}

#[test]
fn given_forest_when_round_tripping_then_each_tree_is_rebuilt_isomorphically() {
    // Arrange
    let records = vec![
        FlatRecord::root(id(1), "North"),
        FlatRecord::new(id(11), "N1", Some(id(1))),
        FlatRecord::new(id(12), "N2", Some(id(1))),
        FlatRecord::new(id(111), "N1a", Some(id(11))),
        FlatRecord::root(id(2), "South"),
        FlatRecord::new(id(21), "S1", Some(id(2))),
    ];
    let trees = build_trees(&records).unwrap();

    for tree in &trees {
        // Act
        let rebuilt = build_trees(&flatten(tree)).unwrap();

        // Assert
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(&rebuilt[0], tree);
    }
}

#[test]
fn given_flattened_tree_when_indexing_by_id_then_parent_relation_matches_tree() {
    let tree = build_trees(&sample_records()).unwrap().remove(0);

    let parents: HashMap<Uuid, Option<Uuid>> = flatten(&tree)
        .into_iter()
        .map(|r| (r.id, r.parent_id))
        .collect();

    for node in tree.iter() {
        let expected = tree.find_parent(node.id).ok().map(|p| p.id);
        assert_eq!(parents[&node.id], expected);
    }
}
