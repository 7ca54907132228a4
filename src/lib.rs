//! Mutable multi-parent tree.
//!
//! Nodes carry ordered, bidirectional links to their parents and children, so
//! the structure is a DAG in general even though it is handled as a rooted
//! tree. [`domain::Tree`] adds lookups and structural edits driven by a
//! pluggable [`domain::Traversal`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    BreadthFirst, DepthFirst, ErrorKind, Node, NodeId, NodeLike, Traversal, TraversalKind, Tree,
    TreeError, TreeResult, WeakNode,
};
