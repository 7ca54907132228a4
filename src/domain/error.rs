//! Domain-level errors (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::NodeId;

/// Which end of a link a rejected value was offered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSide {
    Child,
    Parent,
}

impl fmt::Display for LinkSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSide::Child => write!(f, "child"),
            LinkSide::Parent => write!(f, "parent"),
        }
    }
}

/// Coarse classification of [`TreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value offered for linking is not a live node.
    Type,
    /// An id did not resolve to a reachable node.
    NotFound,
    /// The operation is not allowed on the target (e.g. a root).
    InvalidOperation,
}

/// Errors raised by node linking and tree edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("{0} must be a Node")]
    NotANode(LinkSide),

    #[error("cannot add to non-existing node: {0}")]
    AddToMissing(NodeId),

    #[error("cannot move non-existing node: {0}")]
    MoveMissing(NodeId),

    #[error("cannot move to non-existing node: {0}")]
    MoveToMissing(NodeId),

    #[error("cannot remove non-existing node: {0}")]
    RemoveMissing(NodeId),

    #[error("cannot move root node: {0}")]
    MoveRoot(NodeId),

    #[error("cannot remove root node: {0}")]
    RemoveRoot(NodeId),
}

impl TreeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeError::NotANode(_) => ErrorKind::Type,
            TreeError::AddToMissing(_)
            | TreeError::MoveMissing(_)
            | TreeError::MoveToMissing(_)
            | TreeError::RemoveMissing(_) => ErrorKind::NotFound,
            TreeError::MoveRoot(_) | TreeError::RemoveRoot(_) => ErrorKind::InvalidOperation,
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
