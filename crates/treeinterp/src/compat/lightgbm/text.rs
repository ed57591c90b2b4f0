//! LightGBM text model format parser.
//!
//! Parses the `.txt` files written by LightGBM's `save_model()`: a header of
//! `key=value` lines followed by one `Tree=N` section per tree. Only what the
//! leaf predictor and the topology exporter need is kept.

use std::collections::HashMap;
use std::iter::Peekable;
use std::path::Path;
use std::str::{FromStr, Lines};

// =============================================================================
// Error types
// =============================================================================

/// Error type for LightGBM model parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("array size mismatch for {field}: expected {expected}, got {actual}")]
    ArraySizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Decision type bitfield
// =============================================================================

/// Missing value handling strategy of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingType {
    #[default]
    None,
    /// Zeros (and NaN) follow the default direction.
    Zero,
    /// NaN follows the default direction.
    NaN,
}

/// Parsed `decision_type` bitfield.
///
/// - Bit 0: categorical split
/// - Bit 1: missing values go left
/// - Bits 2-3: missing type (0=None, 1=Zero, 2=NaN)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionType {
    pub is_categorical: bool,
    pub default_left: bool,
    pub missing_type: MissingType,
}

impl DecisionType {
    pub fn from_i8(value: i8) -> Self {
        let bits = value as u8;
        DecisionType {
            is_categorical: bits & 1 != 0,
            default_left: bits & 2 != 0,
            missing_type: match (bits >> 2) & 3 {
                1 => MissingType::Zero,
                2 => MissingType::NaN,
                _ => MissingType::None,
            },
        }
    }
}

// =============================================================================
// Parsed tree structure
// =============================================================================

/// A parsed LightGBM tree.
///
/// Internal nodes are numbered `0..num_leaves - 1`; a negative child `c`
/// refers to leaf `!c`.
#[derive(Debug, Clone, Default)]
pub struct LgbTree {
    pub num_leaves: usize,
    pub num_cat: usize,
    /// Feature index per internal node.
    pub split_feature: Vec<i32>,
    /// Numeric threshold, or category set index for categorical splits.
    pub threshold: Vec<f64>,
    pub decision_type: Vec<i8>,
    pub left_child: Vec<i32>,
    pub right_child: Vec<i32>,
    pub leaf_value: Vec<f64>,
    /// Running score at each internal node (shrinkage already applied).
    pub internal_value: Vec<f64>,
    pub is_linear: bool,
    /// Offsets into `cat_threshold`, one more than the number of category sets.
    pub cat_boundaries: Vec<i32>,
    /// Category bitsets, 32 categories per word.
    pub cat_threshold: Vec<u32>,
}

impl LgbTree {
    #[inline]
    pub fn num_splits(&self) -> usize {
        self.num_leaves.saturating_sub(1)
    }

    /// Decoded decision type of internal node `node`.
    #[inline]
    pub fn decision(&self, node: usize) -> DecisionType {
        DecisionType::from_i8(self.decision_type[node])
    }

    /// Bitset of category set `cat_idx`, empty if out of range.
    pub fn category_bitset(&self, cat_idx: usize) -> &[u32] {
        let bounds = (self.cat_boundaries.get(cat_idx), self.cat_boundaries.get(cat_idx + 1));
        match bounds {
            (Some(&start), Some(&end)) if 0 <= start && start <= end => self
                .cat_threshold
                .get(start as usize..end as usize)
                .unwrap_or(&[]),
            _ => &[],
        }
    }
}

// =============================================================================
// Model header
// =============================================================================

/// Parsed LightGBM model header.
#[derive(Debug, Clone)]
pub struct LgbHeader {
    /// Model format version (e.g., "v4")
    pub version: String,
    /// Number of classes (1 for regression and binary)
    pub num_class: usize,
    /// Trees per boosting iteration
    pub num_tree_per_iteration: usize,
    /// Maximum feature index used (0-based)
    pub max_feature_idx: usize,
    pub feature_names: Vec<String>,
}

impl Default for LgbHeader {
    fn default() -> Self {
        Self {
            version: String::new(),
            num_class: 1,
            num_tree_per_iteration: 1,
            max_feature_idx: 0,
            feature_names: Vec::new(),
        }
    }
}

// =============================================================================
// Full model
// =============================================================================

/// A parsed LightGBM model.
#[derive(Debug, Clone)]
pub struct LgbModel {
    pub header: LgbHeader,
    /// Trees in ensemble order: iteration-major, class-minor.
    pub trees: Vec<LgbTree>,
}

impl LgbModel {
    /// Load a model from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_string(&content)
    }

    /// Parse a model from a string.
    pub fn from_string(content: &str) -> Result<Self, ParseError> {
        let mut lines = content.lines().peekable();
        let header = parse_header(&mut lines)?;

        let mut trees = Vec::new();
        while let Some(line) = lines.next() {
            if line.starts_with("Tree=") {
                trees.push(parse_tree(&mut lines)?);
            } else if line == "end of trees" {
                break;
            }
        }

        log::debug!(
            "parsed LightGBM model {}: {} trees, {} per iteration",
            header.version,
            trees.len(),
            header.num_tree_per_iteration
        );
        Ok(LgbModel { header, trees })
    }

    #[inline]
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of output groups: trees per boosting iteration.
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.header.num_tree_per_iteration.max(1)
    }

    /// Number of complete boosting iterations.
    #[inline]
    pub fn num_iterations(&self) -> usize {
        self.trees.len() / self.num_groups()
    }

    #[inline]
    pub fn num_features(&self) -> usize {
        self.header.max_feature_idx + 1
    }

    /// Name of feature `idx`, falling back to LightGBM's `Column_<idx>`.
    pub fn feature_name(&self, idx: usize) -> String {
        self.header
            .feature_names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("Column_{}", idx))
    }
}

// =============================================================================
// Parsing helpers
// =============================================================================

/// `key=value` pairs of one section.
struct Section<'a>(HashMap<&'a str, &'a str>);

impl<'a> Section<'a> {
    /// Collect `key=value` lines until a line matching `stop` (not consumed)
    /// or an empty line (consumed). Bare flag lines are skipped.
    fn read(lines: &mut Peekable<Lines<'a>>, stop: impl Fn(&str) -> bool) -> Self {
        let mut kv = HashMap::new();
        while let Some(&line) = lines.peek() {
            if stop(line) {
                break;
            }
            lines.next();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once('=') {
                kv.insert(key, value);
            }
        }
        Section(kv)
    }

    fn scalar<T: FromStr>(&self, field: &'static str) -> Result<Option<T>, ParseError> {
        self.0
            .get(field)
            .map(|v| {
                v.trim().parse().map_err(|_| ParseError::InvalidValue {
                    field,
                    message: format!("cannot parse {:?}", v),
                })
            })
            .transpose()
    }

    fn required<T: FromStr>(&self, field: &'static str) -> Result<T, ParseError> {
        self.scalar(field)?.ok_or(ParseError::MissingField(field))
    }

    fn array<T: FromStr>(&self, field: &'static str) -> Result<Option<Vec<T>>, ParseError> {
        self.0.get(field).map(|v| parse_array(field, v)).transpose()
    }

    /// Required array of exactly `len` entries.
    fn sized_array<T: FromStr>(&self, field: &'static str, len: usize) -> Result<Vec<T>, ParseError> {
        let values = self.array(field)?.ok_or(ParseError::MissingField(field))?;
        validate_array_size(field, &values, len)?;
        Ok(values)
    }
}

/// Parse the header section until the first tree.
fn parse_header(lines: &mut Peekable<Lines<'_>>) -> Result<LgbHeader, ParseError> {
    let section = Section::read(lines, |line| line.starts_with("Tree="));

    let num_class: usize = section.required("num_class")?;
    let header = LgbHeader {
        version: section.scalar("version")?.unwrap_or_default(),
        num_class,
        num_tree_per_iteration: section
            .scalar("num_tree_per_iteration")?
            .unwrap_or(num_class.max(1)),
        max_feature_idx: section.required("max_feature_idx")?,
        feature_names: section
            .0
            .get("feature_names")
            .map(|names| names.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
    };
    Ok(header)
}

/// Parse a single tree section (after its `Tree=N` line).
fn parse_tree(lines: &mut Peekable<Lines<'_>>) -> Result<LgbTree, ParseError> {
    let section = Section::read(lines, |line| line.starts_with("Tree=") || line == "end of trees");

    let num_leaves: usize = section.required("num_leaves")?;
    let mut tree = LgbTree {
        num_leaves,
        num_cat: section.scalar("num_cat")?.unwrap_or(0),
        is_linear: section.scalar::<i32>("is_linear")?.is_some_and(|v| v != 0),
        ..Default::default()
    };

    // Single-leaf tree has no splits.
    if num_leaves <= 1 {
        tree.leaf_value = section.array("leaf_value")?.unwrap_or_else(|| vec![0.0]);
        validate_array_size("leaf_value", &tree.leaf_value, 1)?;
        return Ok(tree);
    }

    let num_splits = tree.num_splits();
    tree.split_feature = section.sized_array("split_feature", num_splits)?;
    tree.threshold = section.sized_array("threshold", num_splits)?;
    tree.decision_type = section.array("decision_type")?.unwrap_or_else(|| vec![0; num_splits]);
    validate_array_size("decision_type", &tree.decision_type, num_splits)?;
    tree.left_child = section.sized_array("left_child", num_splits)?;
    tree.right_child = section.sized_array("right_child", num_splits)?;
    tree.leaf_value = section.sized_array("leaf_value", num_leaves)?;
    tree.internal_value = section.sized_array("internal_value", num_splits)?;

    if tree.num_cat > 0 {
        tree.cat_boundaries = section.sized_array("cat_boundaries", tree.num_cat + 1)?;
        tree.cat_threshold = section.array("cat_threshold")?.unwrap_or_default();
    }

    Ok(tree)
}

fn parse_array<T: FromStr>(field: &'static str, s: &str) -> Result<Vec<T>, ParseError> {
    s.split_whitespace()
        .map(|v| {
            v.parse().map_err(|_| ParseError::InvalidValue {
                field,
                message: format!("invalid array entry: {}", v),
            })
        })
        .collect()
}

fn validate_array_size<T>(field: &'static str, arr: &[T], expected: usize) -> Result<(), ParseError> {
    if arr.len() != expected {
        return Err(ParseError::ArraySizeMismatch {
            field,
            expected,
            actual: arr.len(),
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
