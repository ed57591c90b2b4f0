//! Merging per-class contribution tables into one row result.

use std::collections::HashMap;

use ndarray::Array2;
use serde::Serialize;

use super::aggregate::FeatureContributions;
use super::ExplainError;

/// Column label for single-output models.
pub const CONTRIBUTION_COLUMN: &str = "Contribution";

/// Name of the key column in [`ContributionTable::header`].
pub const FEATURE_COLUMN: &str = "Feature";

/// Column label for class `class` of a multi-output model.
pub fn class_column(class: usize) -> String {
    format!("Class {}", class)
}

/// Interpretation result for one row.
///
/// One entry per feature, one column per output class. Rows are ordered by
/// descending `|value|` in the first column; cells for a feature that never
/// appears on a class's paths are exactly `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionTable {
    features: Vec<String>,
    columns: Vec<String>,
    /// `[n_features, n_columns]`
    values: Array2<f64>,
}

impl ContributionTable {
    /// Number of feature rows.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Number of contribution columns (classes).
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature names in row order.
    #[inline]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Contribution column labels.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Full header: the feature key column followed by the contribution
    /// columns.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(FEATURE_COLUMN)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Contribution matrix `[n_features, n_columns]`.
    #[inline]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Contributions of `feature`, one per column.
    pub fn row(&self, feature: &str) -> Option<Vec<f64>> {
        let idx = self.features.iter().position(|f| f == feature)?;
        Some(self.values.row(idx).to_vec())
    }

    /// Contribution of `feature` to class `class`.
    pub fn get(&self, feature: &str, class: usize) -> Option<f64> {
        let idx = self.features.iter().position(|f| f == feature)?;
        self.values.get((idx, class)).copied()
    }

    /// Sum of each column.
    pub fn column_totals(&self) -> Vec<f64> {
        self.values.sum_axis(ndarray::Axis(0)).to_vec()
    }

    /// `(feature, contributions)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ndarray::ArrayView1<'_, f64>)> {
        self.features.iter().map(String::as_str).zip(self.values.rows())
    }

    fn single(table: FeatureContributions) -> Self {
        let entries = table.into_entries();
        let values = Array2::from_shape_fn((entries.len(), 1), |(i, _)| entries[i].1);
        Self {
            features: entries.into_iter().map(|(f, _)| f).collect(),
            columns: vec![CONTRIBUTION_COLUMN.to_string()],
            values,
        }
    }
}

/// Merge per-class tables into one [`ContributionTable`].
///
/// A single table is passed through under the [`CONTRIBUTION_COLUMN`] label.
/// Several tables are full-outer-joined on the feature name into columns
/// labelled by [`class_column`]. Features are keyed in first-seen order
/// (class 0's ranked order, then features new in class 1, and so on) and
/// then stably sorted by descending `|class 0|`.
pub fn merge(tables: Vec<FeatureContributions>) -> Result<ContributionTable, ExplainError> {
    let n_classes = tables.len();
    match n_classes {
        0 => return Err(ExplainError::EmptyMerge),
        1 => {
            let table = tables.into_iter().next().ok_or(ExplainError::EmptyMerge)?;
            return Ok(ContributionTable::single(table));
        }
        _ => {}
    }

    let mut features: Vec<String> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut cells: Vec<(usize, usize, f64)> = Vec::new();

    for (class, table) in tables.into_iter().enumerate() {
        for (feature, contribution) in table.into_entries() {
            let slot = match slots.get(&feature) {
                Some(&slot) => slot,
                None => {
                    let slot = features.len();
                    slots.insert(feature.clone(), slot);
                    features.push(feature);
                    slot
                }
            };
            cells.push((slot, class, contribution));
        }
    }

    let mut joined = Array2::<f64>::zeros((features.len(), n_classes));
    for (slot, class, contribution) in cells {
        joined[[slot, class]] = contribution;
    }

    let mut order: Vec<usize> = (0..features.len()).collect();
    order.sort_by(|&a, &b| joined[[b, 0]].abs().total_cmp(&joined[[a, 0]].abs()));

    let values = joined.select(ndarray::Axis(0), &order);
    let features: Vec<String> = order.iter().map(|&i| std::mem::take(&mut features[i])).collect();

    Ok(ContributionTable {
        features,
        columns: (0..n_classes).map(class_column).collect(),
        values,
    })
}
