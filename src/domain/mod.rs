//! Domain layer: nodes, traversal strategies and the tree aggregate
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod id;
pub mod node;
pub mod traversal;
pub mod tree;

pub use error::{ErrorKind, LinkSide, TreeError, TreeResult};
pub use id::NodeId;
pub use node::{Node, NodeLike, WeakNode};
pub use traversal::{
    breadth_first, depth_first, BreadthFirst, BreadthFirstIter, DepthFirst, PostOrderIter,
    Traversal, TraversalKind,
};
pub use tree::Tree;
