//! Shared models for integration tests.
//!
//! Small hand-written LightGBM text models plus a deterministic generator for
//! larger random ensembles. For assertion helpers, use `treeinterp::testing`.

#![allow(dead_code)]

use std::fmt::Write;

use rand::prelude::*;

// =============================================================================
// Hand-written models
// =============================================================================

/// Binary classifier over `x0`, `x1`, `x2` with three iterations.
///
/// - Tree 0: `x0 <= 1` (missing=Zero, default left) then `x1 <= 0`
/// - Tree 1: `x2 <= 5` (missing=NaN, default right)
/// - Tree 2: single leaf
pub const BINARY_MODEL: &str = "tree
version=v4
num_class=1
num_tree_per_iteration=1
label_index=0
max_feature_idx=2
objective=binary sigmoid:1
feature_names=x0 x1 x2
feature_infos=[-5:5] [-5:5] [0:10]
tree_sizes=300 250 150

Tree=0
num_leaves=3
num_cat=0
split_feature=0 1
split_gain=4 2
threshold=1 0
decision_type=6 2
left_child=1 -1
right_child=-3 -2
leaf_value=-0.4 0.25 0.7
leaf_weight=5 5 10
leaf_count=5 5 10
internal_value=0 -0.1
internal_weight=20 10
internal_count=20 10
is_linear=0
shrinkage=1


Tree=1
num_leaves=2
num_cat=0
split_feature=2
split_gain=1
threshold=5
decision_type=8
left_child=-1
right_child=-2
leaf_value=0.15 -0.35
leaf_weight=12 8
leaf_count=12 8
internal_value=-0.05
internal_weight=20
internal_count=20
is_linear=0
shrinkage=0.1


Tree=2
num_leaves=1
num_cat=0
split_feature=
split_gain=
threshold=
decision_type=
left_child=
right_child=
leaf_value=0.01
leaf_weight=
leaf_count=
internal_value=
internal_weight=
internal_count=
is_linear=0
shrinkage=0.1


end of trees

feature_importances:
x0=1
x1=1
x2=1

parameters:
[boosting: gbdt]
[objective: binary]
end of parameters

pandas_categorical:null
";

/// Three-class model, one iteration, with a categorical split in class 2.
pub const THREE_CLASS_MODEL: &str = "tree
version=v4
num_class=3
num_tree_per_iteration=3
label_index=0
max_feature_idx=1
objective=multiclass num_class:3
feature_names=petal colour

Tree=0
num_leaves=2
num_cat=0
split_feature=0
threshold=2.5
decision_type=2
left_child=-1
right_child=-2
leaf_value=0.9 -0.6
internal_value=0.1
is_linear=0
shrinkage=1


Tree=1
num_leaves=3
num_cat=0
split_feature=0 0
threshold=2.5 4.5
decision_type=2 2
left_child=-1 -2
right_child=1 -3
leaf_value=-0.5 0.8 -0.2
internal_value=0 0.2
is_linear=0
shrinkage=1


Tree=2
num_leaves=2
num_cat=1
split_feature=1
threshold=0
decision_type=1
left_child=-1
right_child=-2
leaf_value=0.6 -0.3
internal_value=-0.1
cat_boundaries=0 2
cat_threshold=0 1
is_linear=0
shrinkage=1


end of trees
";

// =============================================================================
// Synthetic models
// =============================================================================

/// Uniform in `[-1, 1)`, rounded to 1/1024 so values print exactly.
fn grid_value(rng: &mut StdRng) -> f64 {
    f64::from(rng.gen_range(-1024i32..1024)) / 1024.0
}

#[derive(Default)]
struct TreeArrays {
    split_feature: Vec<usize>,
    threshold: Vec<f64>,
    left_child: Vec<i32>,
    right_child: Vec<i32>,
    leaf_value: Vec<f64>,
    internal_value: Vec<f64>,
    leaf_parent: Vec<Option<usize>>,
}

impl TreeArrays {
    fn single_leaf(value: f64) -> Self {
        Self { leaf_value: vec![value], leaf_parent: vec![None], ..Self::default() }
    }

    /// Split `leaf` leaf-wise, as LightGBM grows trees: the new split takes
    /// the leaf's place, keeps the old leaf on its left and a fresh leaf on
    /// its right. Splits are numbered in creation order.
    fn split_leaf(&mut self, leaf: usize, feature: usize, threshold: f64, internal: f64, value: f64) {
        let node = self.split_feature.len();
        if let Some(parent) = self.leaf_parent[leaf] {
            if self.left_child[parent] == !(leaf as i32) {
                self.left_child[parent] = node as i32;
            } else {
                self.right_child[parent] = node as i32;
            }
        }
        let new_leaf = self.leaf_value.len();
        self.split_feature.push(feature);
        self.threshold.push(threshold);
        self.internal_value.push(internal);
        self.left_child.push(!(leaf as i32));
        self.right_child.push(!(new_leaf as i32));
        self.leaf_parent[leaf] = Some(node);
        self.leaf_parent.push(Some(node));
        self.leaf_value.push(value);
    }

    /// Random tree with `n_splits` splits. Each split picks any current leaf,
    /// so leaf depths vary within the tree.
    fn grow(rng: &mut StdRng, n_splits: usize, n_features: usize) -> Self {
        let mut tree = Self::single_leaf(grid_value(rng));
        for _ in 0..n_splits {
            let leaf = rng.gen_range(0..tree.leaf_value.len());
            let feature = rng.gen_range(0..n_features);
            let (threshold, internal, value) = (grid_value(rng), grid_value(rng), grid_value(rng));
            tree.split_leaf(leaf, feature, threshold, internal, value);
        }
        tree
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(T::to_string).collect::<Vec<_>>().join(" ")
}

/// Random LightGBM text model with `n_iterations * n_classes` trees of
/// `0..=max_splits` splits each, over features named `f0..f{n_features - 1}`.
pub fn synthetic_model(
    seed: u64,
    n_iterations: usize,
    n_classes: usize,
    n_features: usize,
    max_splits: usize,
) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..n_features).map(|i| format!("f{}", i)).collect();

    let mut out = String::new();
    writeln!(out, "tree\nversion=v4").unwrap();
    writeln!(out, "num_class={}", n_classes).unwrap();
    writeln!(out, "num_tree_per_iteration={}", n_classes).unwrap();
    writeln!(out, "max_feature_idx={}", n_features - 1).unwrap();
    writeln!(out, "feature_names={}\n", join(&names)).unwrap();

    for idx in 0..n_iterations * n_classes {
        let n_splits = rng.gen_range(0..=max_splits);
        let tree = TreeArrays::grow(&mut rng, n_splits, n_features);

        writeln!(out, "Tree={}", idx).unwrap();
        writeln!(out, "num_leaves={}", tree.leaf_value.len()).unwrap();
        writeln!(out, "num_cat=0").unwrap();
        if n_splits > 0 {
            writeln!(out, "split_feature={}", join(&tree.split_feature)).unwrap();
            writeln!(out, "threshold={}", join(&tree.threshold)).unwrap();
            writeln!(out, "decision_type={}", join(&vec![2; n_splits])).unwrap();
            writeln!(out, "left_child={}", join(&tree.left_child)).unwrap();
            writeln!(out, "right_child={}", join(&tree.right_child)).unwrap();
            writeln!(out, "internal_value={}", join(&tree.internal_value)).unwrap();
        }
        writeln!(out, "leaf_value={}", join(&tree.leaf_value)).unwrap();
        writeln!(out, "is_linear=0\nshrinkage=1\n\n").unwrap();
    }
    out.push_str("end of trees\n");
    out
}

/// `n_rows × n_features` matrix of values in `[-1, 1)`.
pub fn synthetic_data(seed: u64, n_rows: usize, n_features: usize) -> ndarray::Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    ndarray::Array2::from_shape_fn((n_rows, n_features), |_| grid_value(&mut rng))
}
