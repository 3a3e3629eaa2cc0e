//! Attribute Lists
//!
//! An attribute list groups attributes under one name and reads or writes
//! them positionally. It has no value of its own.

use std::ops::Index;

use crate::error::{Error, Result};
use crate::identity::{AttributeId, NodeId};
use crate::value::Value;

use super::session::Session;

/// An ordered, indexable group of attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    name: String,
    owner: NodeId,
    attributes: Vec<AttributeId>,
}

impl AttributeList {
    /// Create an empty list owned by `owner`.
    pub fn new(name: impl Into<String>, owner: NodeId) -> Self {
        Self {
            name: name.into(),
            owner,
            attributes: Vec::new(),
        }
    }

    /// Get the list's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the owning node's ID.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Resolve every member's value, in order.
    pub fn get_values(&self, session: &Session) -> Result<Vec<Value>> {
        self.attributes.iter().map(|id| session.get(*id)).collect()
    }

    /// Set members from `values`, pairwise and in order.
    ///
    /// Stops at the shorter of the two sequences: extra values are dropped
    /// and extra members keep their current value. Either every paired
    /// member is written or, if one of them is driven or rejects its value,
    /// none is.
    pub fn set_values<I, V>(&self, session: &mut Session, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let pairs = self
            .attributes
            .iter()
            .copied()
            .zip(values.into_iter().map(Into::into))
            .collect();
        session.set_many(pairs)
    }

    /// Get the member at `index`.
    pub fn get(&self, index: usize) -> Option<AttributeId> {
        self.attributes.get(index).copied()
    }

    /// Append a member.
    pub fn push(&mut self, attribute: AttributeId) {
        self.attributes.push(attribute);
    }

    /// Insert a member at `index`, shifting later members.
    pub fn insert(&mut self, index: usize, attribute: AttributeId) -> Result<()> {
        if index > self.attributes.len() {
            return Err(self.out_of_range(index));
        }
        self.attributes.insert(index, attribute);
        Ok(())
    }

    /// Replace the member at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, attribute: AttributeId) -> Result<AttributeId> {
        if index >= self.attributes.len() {
            return Err(self.out_of_range(index));
        }
        Ok(std::mem::replace(&mut self.attributes[index], attribute))
    }

    /// Remove and return the member at `index`.
    pub fn remove(&mut self, index: usize) -> Result<AttributeId> {
        if index >= self.attributes.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.attributes.remove(index))
    }

    /// Get the number of members.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the list has no members.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over member ids in order.
    pub fn iter(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.attributes.iter().copied()
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::IndexOutOfRange {
            list: self.name.clone(),
            index,
            len: self.attributes.len(),
        }
    }
}

impl Index<usize> for AttributeList {
    type Output = AttributeId;

    fn index(&self, index: usize) -> &Self::Output {
        &self.attributes[index]
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a AttributeId;
    type IntoIter = std::slice::Iter<'a, AttributeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::kinds::{AttributeKind, NodeSchema};

    fn three_floats(session: &mut Session) -> (Node, AttributeList) {
        let schema = NodeSchema::from_attributes(
            "Triple",
            [
                ("a", AttributeKind::Float),
                ("b", AttributeKind::Float),
                ("c", AttributeKind::Float),
            ],
        )
        .unwrap();
        let node = Node::new(&schema, "triple", session);
        let list = node.attribute_list("abc", &["a", "b", "c"]).unwrap();
        (node, list)
    }

    #[test]
    fn get_values_preserves_order() {
        let mut session = Session::new();
        let (node, list) = three_floats(&mut session);
        session.set(node.get_attribute("b").unwrap(), 2.0).unwrap();

        let values = list.get_values(&session).unwrap();
        assert_eq!(values, vec![Value::Float(0.0), Value::Float(2.0), Value::Float(0.0)]);
    }

    #[test]
    fn short_input_leaves_trailing_members() {
        let mut session = Session::new();
        let (node, list) = three_floats(&mut session);
        session.set(node.get_attribute("c").unwrap(), 9.0).unwrap();

        list.set_values(&mut session, [1.0, 2.0]).unwrap();

        let values = list.get_values(&session).unwrap();
        assert_eq!(values, vec![Value::Float(1.0), Value::Float(2.0), Value::Float(9.0)]);
    }

    #[test]
    fn extra_values_are_ignored() {
        let mut session = Session::new();
        let (_, list) = three_floats(&mut session);

        list.set_values(&mut session, [1, 2, 3, 4, 5]).unwrap();

        let values = list.get_values(&session).unwrap();
        assert_eq!(values, vec![Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)]);
    }

    #[test]
    fn failed_member_writes_nothing() {
        let mut session = Session::new();
        let (_, list) = three_floats(&mut session);

        let err = list
            .set_values(&mut session, vec![Value::from(1.0), Value::from("oops")])
            .unwrap_err();
        assert!(err.is_validation());

        let values = list.get_values(&session).unwrap();
        assert_eq!(values, vec![Value::Float(0.0); 3]);
    }

    #[test]
    fn sequence_operations() {
        let mut session = Session::new();
        let (node, mut list) = three_floats(&mut session);
        let a = node.get_attribute("a").unwrap();
        let c = node.get_attribute("c").unwrap();

        assert_eq!(list.remove(0).unwrap(), a);
        assert_eq!(list.len(), 2);

        list.insert(2, a).unwrap();
        assert_eq!(list[2], a);

        assert_eq!(list.replace(1, a).unwrap(), c);
        assert_eq!(list.iter().filter(|id| *id == a).count(), 2);

        assert!(list.insert(10, a).unwrap_err().is_lookup());
        assert!(list.remove(10).is_err());
        assert!(list.replace(10, a).is_err());
    }
}
