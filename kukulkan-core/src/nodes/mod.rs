//! Node Kinds
//!
//! Built-in node kinds with domain helpers layered over their attributes.

mod transform;

pub use transform::Transform;
