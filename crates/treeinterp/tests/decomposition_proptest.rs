//! Property-based tests for decision-path interpretation.
//!
//! Random ensembles are generated as LightGBM text models and interpreted
//! end to end. Arbitrary topologies are also fed straight into `TreeStore`
//! as node tables in random row order.

mod common;

use proptest::prelude::*;

use common::{synthetic_data, synthetic_model};
use treeinterp::compat::lightgbm::{LgbLeafPredictor, LgbModel};
use treeinterp::repr::{SplitId, TreeId, TreeNode};
use treeinterp::{decompose, InterpretConfig, LeafPredictor, NodeRow, Parallelism, TreeModel, TreeStore};

const TOLERANCE: f64 = 1e-9;

/// Seed, iterations, classes, features and maximum splits per tree.
fn arb_shape() -> impl Strategy<Value = (u64, usize, usize, usize, usize)> {
    (any::<u64>(), 1usize..6, 1usize..4, 1usize..5, 0usize..24)
}

// =============================================================================
// Topologies
// =============================================================================

#[derive(Debug, Clone)]
enum Topology {
    Leaf(f64),
    Split {
        feature: usize,
        value: f64,
        left: Box<Topology>,
        right: Box<Topology>,
    },
}

/// Binary trees whose branches stop at independent random depths.
fn arb_topology() -> impl Strategy<Value = Topology> {
    let leaf = (-1.0f64..1.0).prop_map(Topology::Leaf);
    leaf.prop_recursive(8, 64, 2, |inner| {
        (0usize..4, -1.0f64..1.0, inner.clone(), inner).prop_map(|(feature, value, left, right)| {
            Topology::Split { feature, value, left: Box::new(left), right: Box::new(right) }
        })
    })
}

/// Expected path of one leaf: `(feature, value)` of every split from the root,
/// then the leaf value.
type LeafPath = (Vec<(String, f64)>, f64);

/// Append the node rows of `topology` as tree `tree`. Splits and leaves are
/// numbered in preorder, so leaf `i` of the tree is `paths[i]`.
fn flatten(
    tree: TreeId,
    topology: &Topology,
    parent: Option<SplitId>,
    ancestors: &mut Vec<(String, f64)>,
    rows: &mut Vec<NodeRow>,
    paths: &mut Vec<LeafPath>,
) {
    match topology {
        Topology::Leaf(value) => {
            rows.push(NodeRow::leaf(tree, paths.len() as u32, parent, *value));
            paths.push((ancestors.clone(), *value));
        }
        Topology::Split { feature, value, left, right } => {
            let split = rows.iter().filter(|r| r.tree_index == tree && r.split_index.is_some()).count() as SplitId;
            let name = format!("f{}", feature);
            rows.push(NodeRow::internal(tree, split, name.clone(), parent, *value));
            ancestors.push((name, *value));
            flatten(tree, left, Some(split), ancestors, rows, paths);
            flatten(tree, right, Some(split), ancestors, rows, paths);
            ancestors.pop();
        }
    }
}

/// Random forests as node tables in shuffled row order, with each tree's
/// expected leaf paths.
fn arb_node_table() -> impl Strategy<Value = (Vec<Vec<LeafPath>>, Vec<NodeRow>)> {
    prop::collection::vec(arb_topology(), 1..4).prop_flat_map(|topologies| {
        let mut rows = Vec::new();
        let mut forest = Vec::with_capacity(topologies.len());
        for (tree, topology) in topologies.iter().enumerate() {
            let mut paths = Vec::new();
            flatten(tree as TreeId, topology, None, &mut Vec::new(), &mut rows, &mut paths);
            forest.push(paths);
        }
        (Just(forest), Just(rows).prop_shuffle())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Each class column sums to the sum of `leaf - root` over its trees.
    #[test]
    fn contributions_conserve_leaf_values(
        (seed, n_iterations, n_classes, n_features, max_splits) in arb_shape()
    ) {
        let text = synthetic_model(seed, n_iterations, n_classes, n_features, max_splits);
        let lgb = LgbModel::from_string(&text).unwrap();
        let model = TreeModel::from_lgb(&lgb, InterpretConfig::default()).unwrap();
        let data = synthetic_data(seed, 8, n_features);

        let leaves = LgbLeafPredictor::new(&lgb)
            .unwrap()
            .predict_leaf(data.view(), n_iterations, Parallelism::Sequential)
            .unwrap();
        let tables = model.interpret_all(data.view(), None).unwrap();

        for (row, table) in tables.iter().enumerate() {
            let sums = table.column_totals();
            prop_assert_eq!(sums.len(), n_classes);
            for (class, sum) in sums.iter().enumerate() {
                let expected: f64 = (0..n_iterations)
                    .map(|t| {
                        let tree = &lgb.trees[t * n_classes + class];
                        let leaf_value = tree.leaf_value[leaves[[row, t * n_classes + class]] as usize];
                        leaf_value - tree.internal_value.first().copied().unwrap_or(leaf_value)
                    })
                    .sum();
                prop_assert!((sum - expected).abs() <= TOLERANCE, "class {}: {} vs {}", class, sum, expected);
            }
        }
    }

    /// Features are unique and ordered by non-increasing `|class 0|`.
    #[test]
    fn tables_are_ranked_and_unique(
        (seed, n_iterations, n_classes, n_features, max_splits) in arb_shape()
    ) {
        let text = synthetic_model(seed, n_iterations, n_classes, n_features, max_splits);
        let model = TreeModel::from_string(&text, InterpretConfig::default()).unwrap();
        let data = synthetic_data(seed, 8, n_features);

        for table in model.interpret_all(data.view(), None).unwrap() {
            prop_assert_eq!(table.n_columns(), n_classes);
            let mut names = table.features().to_vec();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), table.n_features());

            let first: Vec<f64> = table.values().column(0).iter().map(|v| v.abs()).collect();
            prop_assert!(first.windows(2).all(|w| w[0] >= w[1]));
            prop_assert!(table.values().iter().all(|v| v.is_finite()));
        }
    }

    /// Path contributions telescope to `leaf - root` for every leaf.
    #[test]
    fn paths_telescope(seed in any::<u64>(), max_splits in 0usize..32) {
        let text = synthetic_model(seed, 3, 1, 4, max_splits);
        let store = LgbModel::from_string(&text).unwrap().to_tree_store().unwrap();

        for tree in store.trees() {
            let root_value = tree.root().value();
            for node in tree.nodes() {
                let TreeNode::Leaf(leaf) = node else { continue };
                let path = decompose(tree, leaf.leaf_index).unwrap();
                prop_assert_eq!(path.len(), tree.leaf_depth(leaf.leaf_index).unwrap());
                prop_assert!((path.total() - (leaf.value - root_value)).abs() <= TOLERANCE);
            }
        }
    }

    /// Row order of the node table does not matter: every leaf decomposes
    /// into exactly its root-to-leaf splits.
    #[test]
    fn shuffled_node_tables_decompose((forest, rows) in arb_node_table()) {
        let store = TreeStore::from_rows(rows, 1).unwrap();
        prop_assert_eq!(store.n_trees(), forest.len());

        for (tree, paths) in store.trees().zip(&forest) {
            let root_value = tree.root().value();
            prop_assert_eq!(tree.n_leaves(), paths.len());
            for (leaf, (ancestors, leaf_value)) in paths.iter().enumerate() {
                let leaf = leaf as u32;
                let path = decompose(tree, leaf).unwrap();

                prop_assert_eq!(path.len(), ancestors.len());
                prop_assert_eq!(tree.leaf_depth(leaf), Some(ancestors.len()));
                let features: Vec<&str> = ancestors.iter().map(|(f, _)| f.as_str()).collect();
                prop_assert_eq!(path.features(), &features[..]);
                let values: Vec<f64> = ancestors.iter().map(|&(_, v)| v).chain([*leaf_value]).collect();
                prop_assert_eq!(path.values(), &values[..]);
                prop_assert!((path.total() - (leaf_value - root_value)).abs() <= TOLERANCE);
            }
        }
    }

    /// Parallel and sequential interpretation agree bit for bit.
    #[test]
    fn parallelism_is_deterministic(seed in any::<u64>()) {
        let text = synthetic_model(seed, 10, 2, 5, 15);
        let data = synthetic_data(seed, 32, 5);
        let rows: Vec<usize> = (0..32).collect();

        let run = |n_threads: usize| {
            let config = InterpretConfig::builder().n_threads(n_threads).build().unwrap();
            TreeModel::from_string(&text, config)
                .unwrap()
                .interpret(data.view(), &rows, None)
                .unwrap()
        };
        prop_assert_eq!(run(1), run(3));
    }
}
