//! Graph Registry
//!
//! A graph owns a set of nodes keyed by id, in insertion order. It does not
//! evaluate anything and does not own the attribute connections between its
//! nodes; those live in the [`Session`](super::Session).

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identity::{GraphId, NodeId};

use super::node::Node;

/// A registry of nodes.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Unique identifier for this graph.
    id: GraphId,

    /// Member nodes, indexed by ID.
    nodes: IndexMap<NodeId, Node>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            id: GraphId::new(),
            nodes: IndexMap::new(),
        }
    }

    /// Get the graph's ID.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Add a node to the graph.
    ///
    /// Adding a node whose id is already present replaces the stored node
    /// in place.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        debug!(graph = %self.id, node = %id, name = %node.name(), "adding node");
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, given by id or by reference, and return it.
    ///
    /// Connections of the node's attributes are not touched; disconnect
    /// them through the session before or after removal.
    pub fn remove_node(&mut self, node: impl Into<NodeId>) -> Result<Node> {
        let node_id = node.into();
        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(Error::MissingNode(node_id))?;
        debug!(graph = %self.id, node = %node_id, name = %node.name(), "removed node");
        Ok(node)
    }

    /// Get a reference to a node.
    pub fn get_node(&self, node_id: NodeId) -> Result<&Node> {
        self.nodes.get(&node_id).ok_or(Error::MissingNode(node_id))
    }

    /// Find the first node with the given name.
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|node| node.name() == name)
    }

    /// Check if the graph holds a node with this ID.
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Iterate over member nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.values().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}
