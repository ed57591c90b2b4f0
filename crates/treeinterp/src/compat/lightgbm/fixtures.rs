//! Small hand-written LightGBM models shared by unit tests.

/// Regression model over `age` and `income`.
///
/// Tree 0 splits on `age <= 30` (internal value 0.1), then on
/// `income <= 50000` (0.3); leaves 0.6 / 0.2 on the left side, -0.1 on the
/// right. Tree 1 is a single leaf 0.2.
pub(crate) const REGRESSION_MODEL: &str = "tree
version=v4
num_class=1
num_tree_per_iteration=1
label_index=0
max_feature_idx=1
objective=regression
feature_names=age income
feature_infos=[18:90] [0:200000]
tree_sizes=400 200

Tree=0
num_leaves=3
num_cat=0
split_feature=0 1
split_gain=10 5
threshold=30.000000000000004 50000.000000000007
decision_type=2 2
left_child=1 -1
right_child=-3 -2
leaf_value=0.6 0.2 -0.1
leaf_weight=10 10 20
leaf_count=10 10 20
internal_value=0.1 0.3
internal_weight=40 20
internal_count=40 20
is_linear=0
shrinkage=1


Tree=1
num_leaves=1
num_cat=0
split_feature=
split_gain=
threshold=
decision_type=
left_child=
right_child=
leaf_value=0.2
leaf_weight=
leaf_count=
internal_value=
internal_weight=
internal_count=
is_linear=0
shrinkage=1


end of trees

feature_importances:
age=1
income=1

parameters:
[boosting: gbdt]
end of parameters
";

/// Two-class model with two iterations and no feature names.
///
/// - Tree 0 (class 0): `f0 <= 0.5` with leaves 0.3 / -0.2
/// - Tree 1 (class 1): categorical `f1 in {1, 3}` with leaves 0.4 / -0.1
/// - Tree 2 (class 0): `f1 <= 2.5` (NaN goes left) to leaf 0.1, else
///   `f0 <= 1.5` to leaves 0.05 / -0.15
/// - Tree 3 (class 1): single leaf -0.02
pub(crate) const MULTICLASS_MODEL: &str = "tree
version=v4
num_class=2
num_tree_per_iteration=2
label_index=0
max_feature_idx=1
objective=multiclass num_class:2

Tree=0
num_leaves=2
num_cat=0
split_feature=0
threshold=0.5
decision_type=2
left_child=-1
right_child=-2
leaf_value=0.3 -0.2
internal_value=0.05
is_linear=0
shrinkage=1


Tree=1
num_leaves=2
num_cat=1
split_feature=1
threshold=0
decision_type=1
left_child=-1
right_child=-2
leaf_value=0.4 -0.1
internal_value=0.1
cat_boundaries=0 1
cat_threshold=10
is_linear=0
shrinkage=1


Tree=2
num_leaves=3
num_cat=0
split_feature=1 0
threshold=2.5 1.5
decision_type=10 0
left_child=-1 -2
right_child=1 -3
leaf_value=0.1 0.05 -0.15
internal_value=-0.01 -0.05
is_linear=0
shrinkage=1


Tree=3
num_leaves=1
num_cat=0
leaf_value=-0.02
is_linear=0
shrinkage=1


end of trees
";
