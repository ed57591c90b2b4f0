//! Canonical tree topology representation.
//!
//! The exporter hands over a flat [`NodeRow`] table; [`TreeStore::from_rows`]
//! validates it once into typed [`TreeNode`] arenas that every decomposition
//! then reads without locking.

pub mod node;
pub mod store;
pub mod table;

pub use node::{InternalNode, LeafId, LeafNode, NodeRef, SplitId, TreeId, TreeNode};
pub use store::{TopologyError, Tree, TreeStore};
pub use table::NodeRow;
