//! Rooted view over a node graph with structural edits.
//!
//! Lookups always walk from the root, so nodes linked elsewhere but not
//! reachable from it are invisible here. Each traversal-driven operation has
//! a breadth-first default and a `_with` variant taking any [`Traversal`].

use tracing::{debug, instrument};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{link, unlink, Node, NodeLike};
use crate::domain::traversal::{breadth_first, BreadthFirst, Traversal};
use crate::domain::NodeId;

#[derive(Debug, Default)]
pub struct Tree {
    root: Option<Node>,
}

impl Tree {
    /// Empty tree, no root assigned.
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn set_root(&mut self, root: Node) {
        self.root = Some(root);
    }

    pub fn take_root(&mut self) -> Option<Node> {
        self.root.take()
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.nodes_with(&BreadthFirst)
    }

    pub fn nodes_with<T: Traversal + ?Sized>(&self, traversal: &T) -> Vec<Node> {
        let mut nodes = Vec::new();
        traversal.traverse(self.root(), &mut |node| nodes.push(node.clone()));
        nodes
    }

    pub fn size(&self) -> usize {
        self.size_with(&BreadthFirst)
    }

    pub fn size_with<T: Traversal + ?Sized>(&self, traversal: &T) -> usize {
        let mut total = 0;
        traversal.traverse(self.root(), &mut |_| total += 1);
        total
    }

    /// Longest root-to-leaf path counted in nodes; 0 without a root.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        match &self.root {
            Some(root) => branch_height(root),
            None => 0,
        }
    }

    pub fn find_node(&self, id: impl Into<NodeId>) -> Option<Node> {
        self.find_node_with(id, &BreadthFirst)
    }

    /// First node in traversal order carrying `id`.
    pub fn find_node_with<T: Traversal + ?Sized>(
        &self,
        id: impl Into<NodeId>,
        traversal: &T,
    ) -> Option<Node> {
        let id = id.into();
        let mut found: Option<Node> = None;
        traversal.traverse(self.root(), &mut |node| {
            if found.is_none() && node.has_id(&id) {
                found = Some(node.clone());
            }
        });
        found
    }

    pub fn add_node<C: NodeLike + ?Sized>(
        &self,
        node: &C,
        parent_id: impl Into<NodeId>,
    ) -> TreeResult<()> {
        self.add_node_with(node, parent_id, &BreadthFirst)
    }

    /// Attach `node` below the node carrying `parent_id`.
    #[instrument(level = "debug", skip_all)]
    pub fn add_node_with<C: NodeLike + ?Sized, T: Traversal + ?Sized>(
        &self,
        node: &C,
        parent_id: impl Into<NodeId>,
        traversal: &T,
    ) -> TreeResult<()> {
        let parent_id = parent_id.into();
        let parent = self
            .find_node_with(&parent_id, traversal)
            .ok_or(TreeError::AddToMissing(parent_id))?;
        parent.add_child(node)?;
        debug!(parent = %parent, "node added");
        Ok(())
    }

    pub fn move_node(
        &self,
        id: impl Into<NodeId>,
        parent_id: impl Into<NodeId>,
        keep_children: bool,
    ) -> TreeResult<()> {
        self.move_node_with(id, parent_id, keep_children, &BreadthFirst)
    }

    /// Re-attach the node carrying `id` below the node carrying `parent_id`.
    ///
    /// The moved node ends up with exactly one parent. Without
    /// `keep_children` its children stay where they were: each is linked to
    /// all of the node's old parents before being detached from it.
    ///
    /// # Errors
    /// * [`TreeError::MoveMissing`] if `id` is not reachable
    /// * [`TreeError::MoveRoot`] if the node has no parents
    /// * [`TreeError::MoveToMissing`] if `parent_id` is not reachable
    ///
    /// All checks run before anything is changed.
    #[instrument(level = "debug", skip_all)]
    pub fn move_node_with<T: Traversal + ?Sized>(
        &self,
        id: impl Into<NodeId>,
        parent_id: impl Into<NodeId>,
        keep_children: bool,
        traversal: &T,
    ) -> TreeResult<()> {
        let id = id.into();
        let parent_id = parent_id.into();
        let node = self
            .find_node_with(&id, traversal)
            .ok_or_else(|| TreeError::MoveMissing(id.clone()))?;
        if node.is_root() {
            return Err(TreeError::MoveRoot(id));
        }
        let new_parent = self
            .find_node_with(&parent_id, traversal)
            .ok_or(TreeError::MoveToMissing(parent_id))?;

        if !keep_children {
            let parents = node.parents();
            while let Some(child) = node.first_child() {
                for parent in &parents {
                    link(parent, &child);
                }
                unlink(&node, &child);
            }
        }

        node.remove_all_parents();
        link(&new_parent, &node);
        debug!(node = %node, parent = %new_parent, keep_children, "node moved");
        Ok(())
    }

    pub fn remove_node(&self, id: impl Into<NodeId>, keep_children: bool) -> TreeResult<Node> {
        self.remove_node_with(id, keep_children, &BreadthFirst)
    }

    /// Detach the node carrying `id` from all of its parents and return it.
    ///
    /// With `keep_children` only the first child is handed over to the
    /// node's parents; remaining children stay linked to the removed node.
    #[instrument(level = "debug", skip_all)]
    pub fn remove_node_with<T: Traversal + ?Sized>(
        &self,
        id: impl Into<NodeId>,
        keep_children: bool,
        traversal: &T,
    ) -> TreeResult<Node> {
        let id = id.into();
        let node = self
            .find_node_with(&id, traversal)
            .ok_or_else(|| TreeError::RemoveMissing(id.clone()))?;
        if node.is_root() {
            return Err(TreeError::RemoveRoot(id));
        }

        if keep_children {
            if let Some(child) = node.first_child() {
                for parent in node.parents() {
                    link(&parent, &child);
                }
                unlink(&node, &child);
            }
        }

        node.remove_all_parents();
        debug!(node = %node, keep_children, "node removed");
        Ok(node)
    }

    /// Append the breadth-first branch rooted at `node` to `branch`.
    pub fn branch(&self, branch: &mut Vec<Node>, node: &Node) {
        branch.extend(breadth_first(Some(node)));
    }
}

fn branch_height(node: &Node) -> usize {
    1 + node
        .children()
        .iter()
        .map(branch_height)
        .max()
        .unwrap_or(0)
}
