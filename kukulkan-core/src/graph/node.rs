//! Graph Nodes
//!
//! A node is a named container for the attributes declared by its schema.
//! The attribute set is fixed once the node is built.

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identity::{AttributeId, NodeId};
use crate::kinds::NodeSchema;

use super::attribute::Attribute;
use super::attribute_list::AttributeList;
use super::session::Session;

/// A node in the attribute graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// Display name.
    name: String,

    /// Name of the schema the node was built from.
    kind: String,

    /// Built-in attributes by name, in schema declaration order.
    attributes: IndexMap<String, AttributeId>,
}

impl Node {
    /// Build a node from `schema`, creating each declared attribute in
    /// `session`.
    pub fn new(schema: &NodeSchema, name: impl Into<String>, session: &mut Session) -> Self {
        let id = NodeId::new();
        let name = name.into();
        let attributes = schema
            .attributes()
            .map(|(attribute_name, kind)| {
                let attribute = Attribute::new(attribute_name, kind, id, name.as_str());
                (attribute_name.to_string(), session.insert_attribute(attribute))
            })
            .collect();

        debug!(node = %id, name = %name, kind = schema.name(), "created node");

        Self {
            id,
            name,
            kind: schema.name().to_string(),
            attributes,
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the name of the node kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up a built-in attribute by name.
    pub fn get_attribute(&self, name: &str) -> Result<AttributeId> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownAttribute {
                node: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Check if the node has an attribute called `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate over `(name, id)` pairs in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, AttributeId)> + '_ {
        self.attributes.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Get all attribute ids in declaration order.
    pub fn attribute_ids(&self) -> Vec<AttributeId> {
        self.attributes.values().copied().collect()
    }

    /// Group some of this node's attributes into a positional list.
    pub fn attribute_list(&self, list_name: &str, members: &[&str]) -> Result<AttributeList> {
        let mut list = AttributeList::new(list_name, self.id);
        for member in members {
            list.push(self.get_attribute(member)?);
        }
        Ok(list)
    }
}

impl From<&Node> for NodeId {
    fn from(node: &Node) -> Self {
        node.id()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
