//! Attribute and Node Kinds
//!
//! The set of attribute kinds is closed: each variant of [`AttributeKind`]
//! carries its own validation and default value, and new kinds are added as
//! new variants. Node kinds are described by [`NodeSchema`]s, the static
//! `name -> attribute kind` tables a node is built from.
//!
//! # Validation
//!
//! | Kind          | Accepts                                   | Stores              |
//! |---------------|-------------------------------------------|---------------------|
//! | `String`      | anything                                  | its text form       |
//! | `Float`       | numbers, numeric strings                  | `Value::Float`      |
//! | `Integer`     | integers, finite floats, integer strings  | `Value::Integer`    |
//! | `Matrix`      | `rows` lists of `cols` items              | the value unchanged |
//! | `TypedMatrix` | as `Matrix`, every item valid for `item`  | converted items     |

mod attribute_kind;
mod schema;

pub use attribute_kind::{AttributeKind, ScalarKind};
pub use schema::{NodeSchema, SchemaRegistry};
