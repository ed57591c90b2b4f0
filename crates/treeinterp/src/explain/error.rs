use crate::inference::PredictError;
use crate::repr::{NodeRef, TreeId};

/// Errors raised while interpreting predictions.
///
/// None of these are recoverable by retrying: they indicate a topology that
/// does not match the predictions, or a caller-side indexing error.
#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error("tree {tree}: {node} not found in the exported topology")]
    NodeNotFound { tree: TreeId, node: NodeRef },
    #[error("tree {0} not found in the exported topology")]
    UnknownTree(TreeId),
    #[error("row index {row} out of range for {n_rows} input rows")]
    IndexOutOfRange { row: usize, n_rows: usize },
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("cannot merge an empty set of class tables")]
    EmptyMerge,
    #[error("leaf prediction failed: {0}")]
    Predict(#[from] PredictError),
}
