//! Assertion helpers for interpretation results.
//!
//! Shared by unit tests and the integration tests under `tests/`:
//!
//! ```ignore
//! use treeinterp::testing::{assert_table_approx_eq, DEFAULT_TOLERANCE};
//! ```

use approx::AbsDiffEq;

use crate::explain::ContributionTable;

/// Default absolute tolerance for contribution comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Assert that two `f64` values are within `tolerance` of each other.
///
/// # Examples
///
/// ```
/// # use treeinterp::assert_approx_eq;
/// assert_approx_eq!(0.1 + 0.2, 0.3, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if !(diff <= tol) {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that `table` holds exactly the `expected` rows, in order.
///
/// Each expected row is a feature name and one value per column.
///
/// # Panics
///
/// Panics on a different feature order or a cell off by more than
/// `tolerance`.
pub fn assert_table_approx_eq(table: &ContributionTable, expected: &[(&str, &[f64])], tolerance: f64) {
    let actual: Vec<&str> = table.features().iter().map(String::as_str).collect();
    let wanted: Vec<&str> = expected.iter().map(|(f, _)| *f).collect();
    assert_eq!(actual, wanted, "feature order differs");

    for ((feature, values), (_, row)) in expected.iter().zip(table.iter()) {
        assert_eq!(row.len(), values.len(), "column count differs for {}", feature);
        for (class, (&want, &got)) in values.iter().zip(row.iter()).enumerate() {
            assert!(
                got.abs_diff_eq(&want, tolerance),
                "feature {} column {}: expected {}, got {} (tolerance {})",
                feature,
                class,
                want,
                got,
                tolerance
            );
        }
    }
}

/// Assert that each column of `table` sums to the matching `totals` entry.
///
/// `totals[c]` is the sum over class `c`'s trees of `leaf value - root value`.
pub fn assert_conserves(table: &ContributionTable, totals: &[f64], tolerance: f64) {
    let sums = table.column_totals();
    assert_eq!(sums.len(), totals.len(), "column count differs");
    for (class, (got, want)) in sums.iter().zip(totals).enumerate() {
        assert!(
            got.abs_diff_eq(want, tolerance),
            "column {} sums to {}, expected {} (tolerance {})",
            class,
            got,
            want,
            tolerance
        );
    }
}
