//! Attribute Graph
//!
//! This module implements the attribute dataflow graph: typed ports
//! ("attributes") owned by nodes and wired together by directed connections.
//!
//! # Overview
//!
//! - A [`Session`] owns every attribute in an arena indexed by id, along with
//!   the dirty indicator. Attribute reads and writes go through it.
//! - A [`Node`] is built from a schema and records the ids of its attributes.
//! - A [`Graph`] is a registry of nodes. It does not evaluate anything.
//! - An [`AttributeList`] addresses several attributes positionally.
//!
//! Reading a connected attribute pulls the value from upstream; writing a
//! connected attribute is refused. Each attribute has at most one input and
//! any number of outputs, and connections that would form a cycle are
//! rejected when they are made.
//!
//! # Design Decisions
//!
//! 1. Attributes reference their node and their peers by id only, resolved
//!    through the session. Nothing owns anything cyclically, and a dangling
//!    id shows up as a lookup error instead of a stale reference.
//!
//! 2. The session marks itself dirty inside every mutating operation. Only a
//!    collaborator that consumed the changes marks it clean.
//!
//! 3. The session is single-owner. Use [`SharedSession`] for cross-thread
//!    access.

mod attribute;
mod attribute_list;
mod node;
mod observer;
mod registry;
mod session;
mod shared;
mod state;

pub use attribute::Attribute;
pub use attribute_list::AttributeList;
pub use node::Node;
pub use observer::{ChangeEvent, Subscriber};
pub use registry::Graph;
pub use session::Session;
pub use shared::SharedSession;
pub use state::{DirtyState, EvaluationState};
