//! Attributes
//!
//! An attribute is one typed port of a node. It stores a local value and the
//! ids of its connection peers; the peers themselves live in the session
//! arena, so an attribute never owns another attribute or its node.

use smallvec::SmallVec;

use crate::error::ValidationError;
use crate::identity::{AttributeId, NodeId};
use crate::kinds::AttributeKind;
use crate::value::Value;

/// A typed, validated value holder with directed connections.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Unique identifier for this attribute.
    id: AttributeId,

    /// Name, unique within the owning node.
    name: String,

    /// The node this attribute belongs to.
    owner: NodeId,

    /// Name of the owning node, kept for messages.
    owner_name: String,

    /// How values are validated.
    kind: AttributeKind,

    /// Locally stored value, used while nothing drives this attribute.
    value: Value,

    /// The attribute driving this one, if connected.
    input: Option<AttributeId>,

    /// Attributes driven by this one, in connection order.
    outputs: SmallVec<[AttributeId; 4]>,
}

impl Attribute {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: AttributeKind,
        owner: NodeId,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            id: AttributeId::new(),
            name: name.into(),
            owner,
            owner_name: owner_name.into(),
            value: kind.default_value(),
            kind,
            input: None,
            outputs: SmallVec::new(),
        }
    }

    /// Get the attribute's ID.
    pub fn id(&self) -> AttributeId {
        self.id
    }

    /// Get the attribute's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the owning node's ID.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Get the attribute's kind.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Get the locally stored value.
    ///
    /// This ignores any incoming connection; use
    /// [`Session::get`](super::Session::get) for the resolved value.
    pub fn local_value(&self) -> &Value {
        &self.value
    }

    /// Get the value a fresh attribute of this kind holds.
    pub fn default_value(&self) -> Value {
        self.kind.default_value()
    }

    /// Validate a value against this attribute's kind.
    pub fn validate_value(&self, value: Value) -> Result<Value, ValidationError> {
        self.kind.validate_value(value)
    }

    /// Get the attribute driving this one, if any.
    pub fn input(&self) -> Option<AttributeId> {
        self.input
    }

    /// Check if an incoming connection drives this attribute.
    pub fn is_driven(&self) -> bool {
        self.input.is_some()
    }

    /// Get the attributes this one drives.
    pub fn outputs(&self) -> &[AttributeId] {
        &self.outputs
    }

    /// Check if this attribute has any connection at all.
    pub fn is_connected(&self) -> bool {
        self.input.is_some() || !self.outputs.is_empty()
    }

    /// `node.attribute` path used in messages and logs.
    pub fn path(&self) -> String {
        format!("{}.{}", self.owner_name, self.name)
    }

    pub(crate) fn store(&mut self, value: Value) {
        self.value = value;
    }

    pub(crate) fn set_input(&mut self, input: Option<AttributeId>) {
        self.input = input;
    }

    pub(crate) fn add_output(&mut self, output: AttributeId) {
        if !self.outputs.contains(&output) {
            self.outputs.push(output);
        }
    }

    pub(crate) fn remove_output(&mut self, output: AttributeId) -> bool {
        match self.outputs.iter().position(|id| *id == output) {
            Some(index) => {
                self.outputs.remove(index);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owner_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_attribute() -> Attribute {
        Attribute::new("radius", AttributeKind::Float, NodeId::new(), "joint")
    }

    #[test]
    fn starts_with_default_value() {
        let attribute = float_attribute();
        assert_eq!(attribute.local_value(), &Value::Float(0.0));
        assert!(!attribute.is_connected());
    }

    #[test]
    fn path_joins_node_and_attribute() {
        let attribute = float_attribute();
        assert_eq!(attribute.path(), "joint.radius");
        assert_eq!(attribute.to_string(), "joint.radius");
    }

    #[test]
    fn output_management() {
        let mut attribute = float_attribute();
        let out1 = AttributeId::new();
        let out2 = AttributeId::new();

        attribute.add_output(out1);
        attribute.add_output(out2);
        attribute.add_output(out1);
        assert_eq!(attribute.outputs(), &[out1, out2]);

        assert!(attribute.remove_output(out1));
        assert!(!attribute.remove_output(out1));
        assert_eq!(attribute.outputs(), &[out2]);
    }

    #[test]
    fn validate_uses_kind() {
        let attribute = float_attribute();
        assert_eq!(attribute.validate_value(Value::from("2")), Ok(Value::Float(2.0)));
        assert!(attribute.validate_value(Value::from("two")).is_err());
    }
}
