use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rb234::Tree234;

mod common;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn keys(tree: &Tree234<i64>) -> Vec<i64> {
    tree.iter().copied().collect()
}

/// floor(log2(len + 1)), the tallest a tree of `len` keys can be when every
/// node holds at least one key.
fn height_bound(len: usize) -> usize {
    let bits = usize::BITS - (len + 1).leading_zeros() - 1;
    usize::try_from(bits).unwrap().max(1)
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Contains(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        3 => value_strategy().prop_map(TreeOp::Insert),
        1 => value_strategy().prop_map(TreeOp::Contains),
    ]
}

// ─── Randomized operations against BTreeSet ──────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random inserts and lookups on both Tree234 and BTreeSet,
    /// verifying node bounds and leaf depth after every step.
    #[test]
    fn tree_ops_match_btreeset(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        common::init_tracing();
        let mut tree: Tree234<i64> = Tree234::new();
        let mut model: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                TreeOp::Insert(v) => {
                    prop_assert_eq!(tree.insert(*v), model.insert(*v), "insert({})", v);
                }
                TreeOp::Contains(v) => {
                    prop_assert_eq!(tree.contains(v), model.contains(v), "contains({})", v);
                }
            }
            prop_assert_eq!(tree.verify(), Ok(()), "after {:?}", op);
            prop_assert_eq!(tree.len(), model.len());
            prop_assert!(tree.height() <= height_bound(tree.len()));
        }

        prop_assert_eq!(keys(&tree), model.into_iter().collect::<Vec<_>>());
    }

    /// Re-inserting keys keeps the key sequence and the invariants intact.
    #[test]
    fn duplicate_insert_keeps_keys(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let mut tree: Tree234<i64> = values.iter().copied().collect();
        let before = tree.inorder().to_string();

        for v in &values {
            prop_assert!(!tree.insert(*v));
            prop_assert_eq!(tree.verify(), Ok(()));
        }
        prop_assert_eq!(tree.inorder().to_string(), before);
    }

    /// Ascending and descending insertion orders yield the same keys.
    #[test]
    fn insertion_order_does_not_change_keys(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let forward: Tree234<i64> = values.iter().copied().collect();
        let backward: Tree234<i64> = values.iter().rev().copied().collect();
        prop_assert_eq!(forward.verify(), Ok(()));
        prop_assert_eq!(backward.verify(), Ok(()));
        prop_assert_eq!(keys(&forward), keys(&backward));
    }
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn full_root_splits_before_descent() {
    common::init_tracing();
    let mut tree = Tree234::new();
    for key in [17, 15, 49] {
        assert!(tree.insert(key));
    }
    assert_eq!(tree.print_tree().to_string(), "[15 17 49]\n");
    assert_eq!(tree.height(), 1);

    assert!(tree.insert(34));
    assert_eq!(tree.print_tree().to_string(), "[17]\n  [15]\n  [34 49]\n");
    assert_eq!(tree.height(), 2);
    tree.verify().unwrap();
}

#[test]
fn sample_sequence_keeps_every_key() {
    let inserts = [17, 15, 49, 34, 76, 59, 97, 69, 46, 86, 20, 99, 22, 52, 89, 57, 10, 41, 75, 37];
    let mut tree = Tree234::new();
    for key in inserts {
        assert!(tree.insert(key));
        tree.verify().unwrap();
    }

    let mut expected = inserts.to_vec();
    expected.sort_unstable();
    assert_eq!(keys(&tree), expected);
    for key in inserts {
        assert!(tree.contains(&key));
    }
    assert!(!tree.contains(&18));
    assert!(!tree.contains(&100));
}

#[test]
fn duplicate_of_promoted_median_is_rejected() {
    let mut tree = Tree234::from([10, 20, 30, 40, 50]);
    assert_eq!(tree.print_tree().to_string(), "[20]\n  [10]\n  [30 40 50]\n");

    // Splitting [30 40 50] promotes 40, which is the key being inserted.
    assert!(!tree.insert(40));
    assert_eq!(tree.print_tree().to_string(), "[20 40]\n  [10]\n  [30]\n  [50]\n");
    assert_eq!(tree.len(), 5);
    tree.verify().unwrap();
}

#[test]
fn large_ascending_and_descending_runs() {
    let ascending: Tree234<i64> = (0..10_000).collect();
    ascending.verify().unwrap();
    assert!(ascending.height() <= height_bound(10_000));

    let descending: Tree234<i64> = (0..10_000).rev().collect();
    descending.verify().unwrap();
    assert_eq!(keys(&ascending), keys(&descending));
}

#[test]
fn clear_resets_to_empty_root() {
    let mut tree = Tree234::from([3, 1, 2, 5, 4]);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.print_tree().to_string(), "[]\n");
    assert!(tree.insert(7));
    tree.verify().unwrap();
}

// ─── Comparators ─────────────────────────────────────────────────────────────

#[test]
fn reverse_comparator_orders_descending() {
    let mut tree = Tree234::with_comparator(|a: &i64, b: &i64| b.cmp(a));
    tree.extend([5, 1, 9, 3, 7]);
    tree.verify().unwrap();
    assert_eq!(tree.inorder().to_string(), "9 7 5 3 1");
    assert_eq!(tree.print_tree().to_string(), "[5]\n  [9 7]\n  [3 1]\n");
}

// ─── Trait implementations ───────────────────────────────────────────────────

#[test]
fn debug_clone_and_capacity() {
    let mut tree: Tree234<i64> = Tree234::with_capacity(16);
    assert!(tree.capacity() >= 16);
    tree.extend([2, 1, 3]);
    assert_eq!(format!("{tree:?}"), "{1, 2, 3}");

    let copy = tree.clone();
    tree.insert(4);
    assert_eq!(keys(&copy), [1, 2, 3]);
    assert_eq!(keys(&tree), [1, 2, 3, 4]);
}
