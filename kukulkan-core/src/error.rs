//! Error types for the attribute graph.
//!
//! Failures fall into three categories: a value was rejected by an attribute
//! kind, an operation is forbidden by the current connection state, or the
//! caller referenced something that does not exist. All of them are reported
//! synchronously and leave the graph exactly as it was before the call.

use thiserror::Error;

use crate::identity::{AttributeId, NodeId};

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A value could not be converted to the representation an attribute kind
/// expects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The value is not a number and cannot be parsed as one.
    #[error("{value} cannot be converted to a float")]
    NotNumeric { value: String },

    /// The value cannot be converted to an integer.
    #[error("{value} cannot be converted to an integer")]
    NotInteger { value: String },

    /// The value is not a `rows` by `cols` sequence of sequences.
    #[error("{value} cannot be converted to a {rows}x{cols} matrix")]
    Shape { value: String, rows: usize, cols: usize },

    /// One matrix item failed the item-level validation.
    #[error("matrix item at ({row}, {col}) is invalid: {source}")]
    Item {
        row: usize,
        col: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A value failed an attribute kind's validation.
    Validation,
    /// The operation is disallowed by the current graph state.
    State,
    /// The operation referenced an entity that does not exist.
    Lookup,
}

/// Core error type for graph operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A value was rejected by an attribute kind.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Writing to an attribute that is driven by an incoming connection.
    #[error("attribute {attribute} has an incoming connection, cannot be set")]
    DrivenAttribute { attribute: String },

    /// The destination of a connection already has an input.
    #[error("attribute {destination} is already driven by {existing}")]
    AlreadyDriven { destination: String, existing: String },

    /// The connection would make an attribute its own (indirect) input.
    #[error("connecting {from} to {to} would create a cycle")]
    Cycle { from: String, to: String },

    /// A node cannot be destroyed while its attributes hold connections.
    #[error("node {node} still has {count} attribute connection(s)")]
    StillConnected { node: String, count: usize },

    /// A schema declares the same attribute name twice.
    #[error("schema {schema} declares attribute {attribute} more than once")]
    DuplicateAttribute { schema: String, attribute: String },

    /// A stored schema is filed under a name other than its own.
    #[error("schema stored as {key} is named {name}")]
    SchemaNameMismatch { key: String, name: String },

    /// The node has no attribute with the given name.
    #[error("node {node} has no attribute named {name}")]
    UnknownAttribute { node: String, name: String },

    /// No attribute with the given id exists in the session.
    #[error("attribute {0} does not exist")]
    MissingAttribute(AttributeId),

    /// The graph has no node with the given id.
    #[error("node {0} does not exist")]
    MissingNode(NodeId),

    /// No connection exists between the two attributes.
    #[error("{from} is not connected to {to}")]
    NotConnected { from: String, to: String },

    /// No node schema is registered under the given name.
    #[error("no node schema named {0}")]
    UnknownSchema(String),

    /// The node is not of the kind the caller expected.
    #[error("node {node} is a {actual}, expected a {expected}")]
    WrongNodeKind {
        node: String,
        actual: String,
        expected: String,
    },

    /// An attribute list index is out of range.
    #[error("index {index} is out of range for attribute list {list} of length {len}")]
    IndexOutOfRange { list: String, index: usize, len: usize },

    /// JSON (de)serialization of schemas failed.
    #[error("schema json error: {0}")]
    SchemaJson(#[from] serde_json::Error),

    /// MessagePack encoding of schemas failed.
    #[error("schema encode error: {0}")]
    SchemaEncode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding of schemas failed.
    #[error("schema decode error: {0}")]
    SchemaDecode(#[from] rmp_serde::decode::Error),
}

impl Error {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_)
            | Error::DuplicateAttribute { .. }
            | Error::SchemaNameMismatch { .. }
            | Error::SchemaJson(_)
            | Error::SchemaEncode(_)
            | Error::SchemaDecode(_) => ErrorCategory::Validation,
            Error::DrivenAttribute { .. }
            | Error::AlreadyDriven { .. }
            | Error::Cycle { .. }
            | Error::StillConnected { .. }
            | Error::WrongNodeKind { .. } => ErrorCategory::State,
            Error::UnknownAttribute { .. }
            | Error::MissingAttribute(_)
            | Error::MissingNode(_)
            | Error::NotConnected { .. }
            | Error::UnknownSchema(_)
            | Error::IndexOutOfRange { .. } => ErrorCategory::Lookup,
        }
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    /// Check if this is a state error.
    pub fn is_state(&self) -> bool {
        self.category() == ErrorCategory::State
    }

    /// Check if this is a lookup error.
    pub fn is_lookup(&self) -> bool {
        self.category() == ErrorCategory::Lookup
    }
}
