//! Linkage primitive: a node with ordered, bidirectional parent/child links.
//!
//! Children are held strongly, parents weakly, so a parent -> child -> parent
//! loop is not an ownership cycle. Every link change goes through [`link`] and
//! [`unlink`], which update both endpoints together.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{instrument, trace};

use crate::domain::error::{LinkSide, TreeError, TreeResult};
use crate::domain::NodeId;

struct NodeData {
    id: NodeId,
    children: Vec<Node>,
    parents: Vec<WeakNode>,
}

/// Shared handle to a node. Cloning the handle does not clone the node.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

/// Non-owning handle, used for the parent side of a link.
#[derive(Clone, Default)]
pub struct WeakNode(Weak<RefCell<NodeData>>);

/// A value that may or may not stand for a live node.
///
/// Linking operations accept any `NodeLike` and reject values that do not
/// resolve with [`TreeError::NotANode`].
pub trait NodeLike {
    fn to_node(&self) -> Option<Node>;
}

impl NodeLike for Node {
    fn to_node(&self) -> Option<Node> {
        Some(self.clone())
    }
}

impl NodeLike for WeakNode {
    fn to_node(&self) -> Option<Node> {
        self.upgrade()
    }
}

impl NodeLike for Option<Node> {
    fn to_node(&self) -> Option<Node> {
        self.clone()
    }
}

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    fn points_to(&self, node: &Node) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&node.0))
    }
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Node(Rc::new(RefCell::new(NodeData {
            id: id.into(),
            children: Vec::new(),
            parents: Vec::new(),
        })))
    }

    pub fn id(&self) -> NodeId {
        self.0.borrow().id.clone()
    }

    pub(crate) fn has_id(&self, id: &NodeId) -> bool {
        self.0.borrow().id == *id
    }

    /// Children in insertion order.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Live parents in insertion order.
    pub fn parents(&self) -> Vec<Node> {
        self.0
            .borrow()
            .parents
            .iter()
            .filter_map(WeakNode::upgrade)
            .collect()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.borrow().children.first().cloned()
    }

    fn first_parent(&self) -> Option<Node> {
        self.0.borrow().parents.iter().find_map(WeakNode::upgrade)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Handle identity: true if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn has_children(&self) -> bool {
        !self.0.borrow().children.is_empty()
    }

    pub fn has_parents(&self) -> bool {
        self.0.borrow().parents.iter().any(WeakNode::is_alive)
    }

    pub fn is_root(&self) -> bool {
        !self.has_parents()
    }

    /// True if both nodes share at least one parent (compared by identity).
    pub fn is_brother(&self, other: &Node) -> bool {
        let mine = self.parents();
        let theirs = other.parents();
        mine.iter().any(|p| theirs.iter().any(|q| p.ptr_eq(q)))
    }

    /// True if `other` has a parent with this node's id.
    pub fn is_parent(&self, other: &Node) -> bool {
        let id = self.id();
        other.parents().iter().any(|p| p.has_id(&id))
    }

    /// True if `other` has a child with this node's id.
    pub fn is_child(&self, other: &Node) -> bool {
        let id = self.id();
        other.children().iter().any(|c| c.has_id(&id))
    }

    /// Link `child` below this node.
    ///
    /// Silently does nothing if this node already has a child with `child`'s
    /// id, or if `child` already has a parent with this node's id.
    pub fn add_child<C: NodeLike + ?Sized>(&self, child: &C) -> TreeResult<()> {
        let child = child
            .to_node()
            .ok_or(TreeError::NotANode(LinkSide::Child))?;
        link(self, &child);
        Ok(())
    }

    /// Adds each child in order. Links made before a failure are kept.
    pub fn add_children<C: NodeLike>(&self, children: &[C]) -> TreeResult<()> {
        for child in children {
            self.add_child(child)?;
        }
        Ok(())
    }

    /// Link this node below `parent`.
    ///
    /// Silently does nothing if `parent` already has a child with this node's
    /// id, or if this node already has a parent with `parent`'s id.
    pub fn add_parent<P: NodeLike + ?Sized>(&self, parent: &P) -> TreeResult<()> {
        let parent = parent
            .to_node()
            .ok_or(TreeError::NotANode(LinkSide::Parent))?;
        link(&parent, self);
        Ok(())
    }

    /// Unlink the child carrying `child`'s id, if any.
    pub fn remove_child(&self, child: &Node) {
        let id = child.id();
        let found = self.children().into_iter().find(|c| c.has_id(&id));
        if let Some(found) = found {
            unlink(self, &found);
        }
    }

    pub fn remove_children(&self, children: &[Node]) {
        for child in children {
            self.remove_child(child);
        }
    }

    pub fn remove_all_children(&self) {
        while let Some(first) = self.first_child() {
            unlink(self, &first);
        }
    }

    /// Unlink the parent carrying `parent`'s id, if any.
    pub fn remove_parent(&self, parent: &Node) {
        let id = parent.id();
        let found = self.parents().into_iter().find(|p| p.has_id(&id));
        if let Some(found) = found {
            unlink(&found, self);
        }
    }

    pub fn remove_parents(&self, parents: &[Node]) {
        for parent in parents {
            self.remove_parent(parent);
        }
    }

    pub fn remove_all_parents(&self) {
        while let Some(first) = self.first_parent() {
            unlink(&first, self);
        }
        self.0.borrow_mut().parents.clear();
    }
}

/// Record `child` under `parent` on both endpoints.
///
/// No-op (returns false) when `parent` already has a child with the same id
/// or `child` already has a parent with the same id.
#[instrument(level = "trace", skip_all, fields(parent = %parent, child = %child))]
pub(crate) fn link(parent: &Node, child: &Node) -> bool {
    let child_id = child.id();
    let parent_id = parent.id();
    let exists = parent.children().iter().any(|c| c.has_id(&child_id))
        || child.parents().iter().any(|p| p.has_id(&parent_id));
    if exists {
        trace!("link exists");
        return false;
    }

    parent.0.borrow_mut().children.push(child.clone());
    let mut data = child.0.borrow_mut();
    data.parents.retain(WeakNode::is_alive);
    data.parents.push(parent.downgrade());
    true
}

/// Remove the exact `parent` -> `child` handle pair from both endpoints.
#[instrument(level = "trace", skip_all, fields(parent = %parent, child = %child))]
pub(crate) fn unlink(parent: &Node, child: &Node) -> bool {
    let removed = {
        let mut data = parent.0.borrow_mut();
        match data.children.iter().position(|c| c.ptr_eq(child)) {
            Some(idx) => {
                data.children.remove(idx);
                true
            }
            None => false,
        }
    };

    let mut data = child.0.borrow_mut();
    data.parents.retain(WeakNode::is_alive);
    if let Some(idx) = data.parents.iter().position(|p| p.points_to(parent)) {
        data.parents.remove(idx);
    }
    if !removed {
        trace!("no such link");
    }
    removed
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => write!(f, "{}", data.id),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

// Only ids of neighbours are printed, so cyclic links cannot recurse.
impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(data) = self.0.try_borrow() else {
            return f.debug_struct("Node").finish_non_exhaustive();
        };
        let children: Vec<NodeId> = data.children.iter().map(Node::id).collect();
        let parents: Vec<NodeId> = data
            .parents
            .iter()
            .filter_map(WeakNode::upgrade)
            .map(|p| p.id())
            .collect();
        f.debug_struct("Node")
            .field("id", &data.id)
            .field("children", &children)
            .field("parents", &parents)
            .finish()
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakNode({})", node),
            None => write!(f, "WeakNode(<dropped>)"),
        }
    }
}
