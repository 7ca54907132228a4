//! Traversal strategies over the children relation.
//!
//! Neither strategy deduplicates: a node reachable through several parents
//! is visited once per path. On a cyclic structure both are unbounded.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Node;

/// Pluggable visitation order used by tree operations.
pub trait Traversal {
    /// Calls `visit` on every node reachable from `start`. Visits nothing if
    /// `start` is `None`.
    fn traverse(&self, start: Option<&Node>, visit: &mut dyn FnMut(&Node));
}

/// Level order, siblings in insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

/// Post-order: every child subtree (in order) before the node itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirst;

impl Traversal for BreadthFirst {
    fn traverse(&self, start: Option<&Node>, visit: &mut dyn FnMut(&Node)) {
        for node in breadth_first(start) {
            visit(&node);
        }
    }
}

impl Traversal for DepthFirst {
    fn traverse(&self, start: Option<&Node>, visit: &mut dyn FnMut(&Node)) {
        for node in depth_first(start) {
            visit(&node);
        }
    }
}

pub fn breadth_first(start: Option<&Node>) -> BreadthFirstIter {
    BreadthFirstIter::new(start)
}

pub fn depth_first(start: Option<&Node>) -> PostOrderIter {
    PostOrderIter::new(start)
}

/// Queue based level-order walk.
pub struct BreadthFirstIter {
    queue: VecDeque<Node>,
}

impl BreadthFirstIter {
    fn new(start: Option<&Node>) -> Self {
        let mut queue = VecDeque::new();
        if let Some(start) = start {
            queue.push_back(start.clone());
        }
        Self { queue }
    }
}

impl Iterator for BreadthFirstIter {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.queue.pop_front()?;
        // children are queued before the current node is handed out
        self.queue.extend(current.children());
        Some(current)
    }
}

/// Stack based post-order walk. A node is pushed back as expanded after its
/// children so it surfaces only once they are all done.
pub struct PostOrderIter {
    stack: Vec<(Node, bool)>,
}

impl PostOrderIter {
    fn new(start: Option<&Node>) -> Self {
        let mut stack = Vec::new();
        if let Some(start) = start {
            stack.push((start.clone(), false));
        }
        Self { stack }
    }
}

impl Iterator for PostOrderIter {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, expanded)) = self.stack.pop() {
            if expanded {
                return Some(current);
            }
            let children = current.children();
            self.stack.push((current, true));
            // reverse so the first child is popped first
            for child in children.into_iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Selectable strategy, for configuration and the command line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalKind {
    #[default]
    #[value(alias = "bfs")]
    #[serde(alias = "bfs")]
    BreadthFirst,
    #[value(alias = "dfs")]
    #[serde(alias = "dfs")]
    DepthFirst,
}

impl Traversal for TraversalKind {
    fn traverse(&self, start: Option<&Node>, visit: &mut dyn FnMut(&Node)) {
        match self {
            TraversalKind::BreadthFirst => BreadthFirst.traverse(start, visit),
            TraversalKind::DepthFirst => DepthFirst.traverse(start, visit),
        }
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalKind::BreadthFirst => write!(f, "breadth-first"),
            TraversalKind::DepthFirst => write!(f, "depth-first"),
        }
    }
}

impl FromStr for TraversalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breadth-first" | "breadth_first" | "bfs" => Ok(TraversalKind::BreadthFirst),
            "depth-first" | "depth_first" | "dfs" => Ok(TraversalKind::DepthFirst),
            other => Err(format!("unknown traversal: {other}")),
        }
    }
}
