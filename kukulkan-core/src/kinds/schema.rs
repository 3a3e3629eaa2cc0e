//! Node Schemas
//!
//! A schema is the static list of attributes a node kind is built with. The
//! registry maps kind names to schemas and is what a type database reads and
//! writes: it only ever deals with names and kinds, never live values or
//! connections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Node, Session};

use super::AttributeKind;

/// The attribute layout of one node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    /// Name of the node kind.
    name: String,

    /// Built-in attributes, in declaration order.
    attributes: IndexMap<String, AttributeKind>,
}

impl NodeSchema {
    /// Create an empty schema for the given node kind.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Create a schema from `(attribute name, kind)` pairs.
    ///
    /// Fails if a name appears more than once.
    pub fn from_attributes<I, S>(name: impl Into<String>, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, AttributeKind)>,
        S: Into<String>,
    {
        attributes
            .into_iter()
            .try_fold(Self::new(name), |schema, (attribute, kind)| {
                schema.with_attribute(attribute, kind)
            })
    }

    /// Schema of a built-in node kind. Attribute names are known to be unique.
    pub(crate) fn builtin(name: &str, attributes: &[(&str, AttributeKind)]) -> Self {
        Self {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(attribute, kind)| (attribute.to_string(), *kind))
                .collect(),
        }
    }

    /// Add an attribute declaration.
    ///
    /// Fails if the schema already declares an attribute with that name.
    pub fn with_attribute(mut self, name: impl Into<String>, kind: AttributeKind) -> Result<Self> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(Error::DuplicateAttribute {
                schema: self.name,
                attribute: name,
            });
        }
        self.attributes.insert(name, kind);
        Ok(self)
    }

    /// Get the node kind name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate over `(attribute name, kind)` pairs in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, AttributeKind)> + '_ {
        self.attributes.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Get the kind of a declared attribute.
    pub fn attribute_kind(&self, name: &str) -> Option<AttributeKind> {
        self.attributes.get(name).copied()
    }

    /// Get the number of declared attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the schema declares no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Named node schemas, built-in and user-defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, NodeSchema>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in node kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(crate::nodes::Transform::schema());
        registry
    }

    /// Register a schema, replacing any schema with the same name.
    ///
    /// Returns the replaced schema, if any.
    pub fn register(&mut self, schema: NodeSchema) -> Option<NodeSchema> {
        debug!(schema = %schema.name, attributes = schema.len(), "registering node schema");
        self.schemas.insert(schema.name.clone(), schema)
    }

    /// Get a schema by node kind name.
    pub fn get(&self, name: &str) -> Result<&NodeSchema> {
        self.schemas
            .get(name)
            .ok_or_else(|| Error::UnknownSchema(name.to_string()))
    }

    /// Check if a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Iterate over registered kind names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schemas.keys().map(String::as_str)
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Overlay another registry onto this one. Schemas from `other` win on
    /// name clashes, so user definitions can shadow built-ins.
    pub fn merge(&mut self, other: SchemaRegistry) {
        for (_, schema) in other.schemas {
            self.register(schema);
        }
    }

    /// Create a node of the named kind in `session`.
    pub fn instantiate(
        &self,
        kind: &str,
        node_name: impl Into<String>,
        session: &mut Session,
    ) -> Result<Node> {
        let schema = self.get(kind)?;
        Ok(Node::new(schema, node_name, session))
    }

    /// Serialize the registry to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(json)?;
        registry.check_names()?;
        Ok(registry)
    }

    /// Serialize the registry to MessagePack.
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Load a registry from MessagePack.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        let registry: Self = rmp_serde::from_slice(bytes)?;
        registry.check_names()?;
        Ok(registry)
    }

    /// Make every map key agree with the name stored in its schema.
    fn check_names(&self) -> Result<()> {
        match self.schemas.iter().find(|(key, schema)| **key != schema.name) {
            Some((key, schema)) => Err(Error::SchemaNameMismatch {
                key: key.clone(),
                name: schema.name.clone(),
            }),
            None => Ok(()),
        }
    }
}
