//! Kukulkan Core
//!
//! This crate provides the attribute dataflow graph used by the Kukulkan
//! rigging tools. It implements:
//!
//! - Typed attributes that validate and convert the values stored on them
//! - Directed connections between attributes, with demand-driven evaluation
//! - Nodes built from declarative schemas, and graphs that group them
//! - A session-wide dirty indicator plus change subscribers
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `kinds`: attribute kinds and the node schemas built from them
//! - `graph`: the attribute arena, nodes, graphs and connections
//! - `nodes`: built-in node kinds with domain helpers
//! - `value`: the dynamic value type carried by attributes
//!
//! # Example
//!
//! ```rust
//! use kukulkan_core::graph::Session;
//! use kukulkan_core::nodes::Transform;
//! use kukulkan_core::value::Value;
//!
//! let mut session = Session::new();
//! let (_, hip) = Transform::create("hip", &mut session).unwrap();
//! let (_, knee) = Transform::create("knee", &mut session).unwrap();
//!
//! // The knee follows the hip
//! session.connect(hip.xform(), knee.xform()).unwrap();
//!
//! let identity = Value::matrix((0..4).map(|r| (0..4).map(move |c| if r == c { 1.0 } else { 0.0 })));
//! session.set(hip.xform(), identity.clone()).unwrap();
//!
//! assert_eq!(session.get(knee.xform()).unwrap(), identity);
//! assert!(session.set(knee.xform(), identity).unwrap_err().is_state());
//! ```

pub mod error;
pub mod graph;
pub mod identity;
pub mod kinds;
pub mod nodes;
pub mod value;

pub use error::{Error, ErrorCategory, Result, ValidationError};
pub use graph::{Graph, Node, Session};
pub use value::Value;
