//! Session
//!
//! The session is the arena every attribute lives in, together with the
//! dirty indicator its mutations toggle. Connections are stored as ids on
//! both ends, so nodes in different graphs can be wired together as long as
//! they share a session.
//!
//! # Evaluation
//!
//! Reads are demand-driven. Because an attribute has at most one input,
//! resolving a value means walking the input chain upstream until an
//! undriven attribute is found and returning its local value. The walk is a
//! loop, so chain depth is bounded by memory rather than by the call stack.
//! Nothing is cached: every `get` re-walks the chain.
//!
//! # Cycles
//!
//! `connect` refuses any edge that would make an attribute its own direct or
//! indirect input, which is what guarantees the walk above terminates.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identity::{AttributeId, SubscriberId};
use crate::value::Value;

use super::attribute::Attribute;
use super::node::Node;
use super::observer::{ChangeEvent, Subscriber};
use super::state::{DirtyState, EvaluationState};

/// Arena of attributes plus the session's evaluation state.
#[derive(Debug, Default)]
pub struct Session {
    /// All live attributes, indexed by ID.
    attributes: HashMap<AttributeId, Attribute>,

    /// Dirty flag and revision counter.
    state: EvaluationState,

    /// Callbacks run after each successful mutation.
    subscribers: Vec<Subscriber>,
}

impl Session {
    /// Create an empty, clean session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a freshly built attribute into the arena.
    pub(crate) fn insert_attribute(&mut self, attribute: Attribute) -> AttributeId {
        let id = attribute.id();
        self.attributes.insert(id, attribute);
        id
    }

    /// Get an attribute by ID.
    pub fn attribute(&self, id: AttributeId) -> Result<&Attribute> {
        self.attributes.get(&id).ok_or(Error::MissingAttribute(id))
    }

    fn attribute_mut(&mut self, id: AttributeId) -> Result<&mut Attribute> {
        self.attributes
            .get_mut(&id)
            .ok_or(Error::MissingAttribute(id))
    }

    /// Check if an attribute with this ID is alive.
    pub fn contains(&self, id: AttributeId) -> bool {
        self.attributes.contains_key(&id)
    }

    /// Get the total number of attributes in the session.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    /// Follow the input chain of `id` up to the attribute that supplies its
    /// value. Returns `id` itself when nothing drives it.
    pub fn resolve_source(&self, id: AttributeId) -> Result<AttributeId> {
        let mut current = self.attribute(id)?;
        while let Some(input) = current.input() {
            current = self.attribute(input)?;
        }
        Ok(current.id())
    }

    /// Get the value of an attribute.
    ///
    /// A driven attribute returns the value of its input, recursively; an
    /// undriven one returns its local value.
    pub fn get(&self, id: AttributeId) -> Result<Value> {
        let source = self.resolve_source(id)?;
        Ok(self.attribute(source)?.local_value().clone())
    }

    /// Validate `value` and store it on an attribute.
    ///
    /// Fails without touching the stored value if the attribute is driven by
    /// a connection or if its kind rejects the value.
    pub fn set(&mut self, id: AttributeId, value: impl Into<Value>) -> Result<()> {
        let validated = self.prepare_set(id, value.into())?;
        self.store(id, validated);
        Ok(())
    }

    /// Set several attributes at once.
    ///
    /// Every pair is checked before anything is written, so either all
    /// attributes receive their value or none does.
    pub fn set_many(&mut self, pairs: Vec<(AttributeId, Value)>) -> Result<()> {
        let validated = pairs
            .into_iter()
            .map(|(id, value)| Ok((id, self.prepare_set(id, value)?)))
            .collect::<Result<Vec<_>>>()?;
        for (id, value) in validated {
            self.store(id, value);
        }
        Ok(())
    }

    fn prepare_set(&self, id: AttributeId, value: Value) -> Result<Value> {
        let attribute = self.attribute(id)?;
        if attribute.is_driven() {
            return Err(Error::DrivenAttribute {
                attribute: attribute.path(),
            });
        }
        Ok(attribute.validate_value(value)?)
    }

    fn store(&mut self, id: AttributeId, value: Value) {
        if let Some(attribute) = self.attributes.get_mut(&id) {
            trace!(attribute = %attribute, value = %value, "set attribute value");
            attribute.store(value);
            self.emit(ChangeEvent::ValueSet { attribute: id });
        }
    }

    // ------------------------------------------------------------------------
    // Connections
    // ------------------------------------------------------------------------

    /// Connect `source` to `destination`: `destination` will read its value
    /// from `source`.
    ///
    /// Fails if `destination` already has an input or if the edge would
    /// create a cycle. On failure neither attribute is modified.
    pub fn connect(&mut self, source: AttributeId, destination: AttributeId) -> Result<()> {
        let src = self.attribute(source)?;
        let dst = self.attribute(destination)?;

        if source == destination {
            return Err(Error::Cycle {
                from: src.path(),
                to: dst.path(),
            });
        }
        if let Some(existing) = dst.input() {
            return Err(Error::AlreadyDriven {
                destination: dst.path(),
                existing: self.describe(existing),
            });
        }
        // `destination` must not already feed `source`, directly or not.
        let mut upstream = src.input();
        while let Some(id) = upstream {
            if id == destination {
                return Err(Error::Cycle {
                    from: src.path(),
                    to: dst.path(),
                });
            }
            upstream = self.attribute(id)?.input();
        }

        debug!(source = %src, destination = %dst, "connecting attributes");
        self.attribute_mut(destination)?.set_input(Some(source));
        self.attribute_mut(source)?.add_output(destination);
        self.emit(ChangeEvent::Connected {
            source,
            destination,
        });
        Ok(())
    }

    /// Remove the connection from `source` to `destination`.
    pub fn disconnect(&mut self, source: AttributeId, destination: AttributeId) -> Result<()> {
        let src = self.attribute(source)?;
        let dst = self.attribute(destination)?;

        if dst.input() != Some(source) || !src.outputs().contains(&destination) {
            return Err(Error::NotConnected {
                from: src.path(),
                to: dst.path(),
            });
        }

        debug!(source = %src, destination = %dst, "disconnecting attributes");
        self.attribute_mut(source)?.remove_output(destination);
        self.attribute_mut(destination)?.set_input(None);
        self.emit(ChangeEvent::Disconnected {
            source,
            destination,
        });
        Ok(())
    }

    /// Check if `source` drives `destination` directly.
    pub fn is_connected(&self, source: AttributeId, destination: AttributeId) -> bool {
        self.attributes
            .get(&destination)
            .is_some_and(|dst| dst.input() == Some(source))
    }

    /// Collect every attribute whose value depends on `id`, nearest first.
    pub fn downstream(&self, id: AttributeId) -> Result<Vec<AttributeId>> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut queue: VecDeque<AttributeId> = self.attribute(id)?.outputs().iter().copied().collect();

        // BFS over outputs
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.attribute(current)?.outputs().iter().copied());
        }

        Ok(result)
    }

    // ------------------------------------------------------------------------
    // Node lifecycle
    // ------------------------------------------------------------------------

    /// Tear down every connection entering or leaving `node`'s attributes.
    ///
    /// Returns the number of connections removed.
    pub fn disconnect_node(&mut self, node: &Node) -> Result<usize> {
        let mut removed = 0;
        for id in node.attribute_ids() {
            if let Some(input) = self.attribute(id)?.input() {
                self.disconnect(input, id)?;
                removed += 1;
            }
            let outputs = self.attribute(id)?.outputs().to_vec();
            for output in outputs {
                self.disconnect(id, output)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Remove `node`'s attributes from the session.
    ///
    /// The node must be fully disconnected first; see
    /// [`disconnect_node`](Self::disconnect_node).
    pub fn destroy_node(&mut self, node: Node) -> Result<()> {
        let ids = node.attribute_ids();
        let mut count = 0;
        for id in &ids {
            let attribute = self.attribute(*id)?;
            count += attribute.outputs().len() + usize::from(attribute.is_driven());
        }
        if count > 0 {
            return Err(Error::StillConnected {
                node: node.name().to_string(),
                count,
            });
        }

        for id in ids {
            self.attributes.remove(&id);
        }
        debug!(node = %node.id(), name = %node.name(), "destroyed node");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Dirty state and observers
    // ------------------------------------------------------------------------

    /// Check if anything changed since the last [`mark_clean`](Self::mark_clean).
    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Get the current dirty state.
    pub fn dirty_state(&self) -> DirtyState {
        self.state.dirty_state()
    }

    /// Get the number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.state.revision()
    }

    /// Acknowledge all pending changes.
    pub fn mark_clean(&mut self) {
        self.state.mark_clean();
    }

    /// Register a callback run after every successful mutation.
    pub fn subscribe<F>(&mut self, notify: F) -> SubscriberId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let subscriber = Subscriber::new(notify);
        let id = subscriber.id();
        self.subscribers.push(subscriber);
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id() != id);
        self.subscribers.len() != before
    }

    fn emit(&mut self, event: ChangeEvent) {
        self.state.mark_dirty();
        for subscriber in &self.subscribers {
            subscriber.notify(&event);
        }
    }

    fn describe(&self, id: AttributeId) -> String {
        self.attributes
            .get(&id)
            .map(Attribute::path)
            .unwrap_or_else(|| id.to_string())
    }
}
