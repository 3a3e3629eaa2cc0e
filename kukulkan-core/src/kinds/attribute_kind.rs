//! Attribute Kinds
//!
//! Validation rules for every built-in attribute kind.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value::Value;

/// Scalar kinds usable as the item type of a [`AttributeKind::TypedMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Float,
    Integer,
}

impl ScalarKind {
    /// The value a fresh attribute of this kind holds.
    pub fn default_value(&self) -> Value {
        match self {
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Integer => Value::Integer(0),
        }
    }

    /// Convert `value` to this scalar kind.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        match self {
            ScalarKind::String => Ok(to_string(value)),
            ScalarKind::Float => to_float(value),
            ScalarKind::Integer => to_integer(value),
        }
    }
}

/// The kind of an attribute: how its values are validated and what it holds
/// before the first `set`.
///
/// The serialized form is the kind identifier stored in node schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Any value, converted to its string representation.
    String,
    /// A floating-point number.
    Float,
    /// An integer.
    Integer,
    /// A `rows` by `cols` sequence of sequences with untyped items.
    Matrix { rows: usize, cols: usize },
    /// A matrix whose items are converted to `item`.
    TypedMatrix {
        rows: usize,
        cols: usize,
        item: ScalarKind,
    },
}

impl AttributeKind {
    /// A 4 by 4 float transformation matrix.
    pub const fn xform() -> Self {
        AttributeKind::TypedMatrix {
            rows: 4,
            cols: 4,
            item: ScalarKind::Float,
        }
    }

    /// Short name of the kind, as shown to users.
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Float => "float",
            AttributeKind::Integer => "integer",
            AttributeKind::Matrix { .. } => "matrix",
            AttributeKind::TypedMatrix { .. } => "typed_matrix",
        }
    }

    /// The value a fresh attribute of this kind holds.
    pub fn default_value(&self) -> Value {
        match self {
            AttributeKind::String => ScalarKind::String.default_value(),
            AttributeKind::Float => ScalarKind::Float.default_value(),
            AttributeKind::Integer => ScalarKind::Integer.default_value(),
            AttributeKind::Matrix { rows, cols } => Value::filled(*rows, *cols, Value::Float(0.0)),
            AttributeKind::TypedMatrix { rows, cols, item } => {
                Value::filled(*rows, *cols, item.default_value())
            }
        }
    }

    /// Validate and normalize a value for this kind.
    ///
    /// Returns the value to store, or the reason it was rejected.
    pub fn validate_value(&self, value: Value) -> Result<Value, ValidationError> {
        match self {
            AttributeKind::String => ScalarKind::String.validate(value),
            AttributeKind::Float => ScalarKind::Float.validate(value),
            AttributeKind::Integer => ScalarKind::Integer.validate(value),
            AttributeKind::Matrix { rows, cols } => {
                let matrix = into_rows(value, *rows, *cols)?;
                Ok(from_rows(matrix))
            }
            AttributeKind::TypedMatrix { rows, cols, item } => {
                let mut matrix = into_rows(value, *rows, *cols)?;
                for (r, row) in matrix.iter_mut().enumerate() {
                    for (c, cell) in row.iter_mut().enumerate() {
                        let raw = std::mem::replace(cell, Value::Integer(0));
                        *cell = item.validate(raw).map_err(|e| ValidationError::Item {
                            row: r,
                            col: c,
                            source: Box::new(e),
                        })?;
                    }
                }
                Ok(from_rows(matrix))
            }
        }
    }
}

fn to_string(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s),
        other => Value::String(other.to_string()),
    }
}

fn to_float(value: Value) -> Result<Value, ValidationError> {
    match value {
        Value::Float(v) => Ok(Value::Float(v)),
        Value::Integer(v) => Ok(Value::Float(v as f64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ValidationError::NotNumeric { value: s }),
        other => Err(ValidationError::NotNumeric {
            value: other.to_string(),
        }),
    }
}

fn to_integer(value: Value) -> Result<Value, ValidationError> {
    match value {
        Value::Integer(v) => Ok(Value::Integer(v)),
        // Truncates toward zero; NaN and infinities have no integer form.
        Value::Float(v) if v.is_finite() && v.abs() < i64::MAX as f64 => {
            Ok(Value::Integer(v.trunc() as i64))
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| ValidationError::NotInteger { value: s }),
        other => Err(ValidationError::NotInteger {
            value: other.to_string(),
        }),
    }
}

/// Split a value into exactly `rows` rows of exactly `cols` items.
fn into_rows(value: Value, rows: usize, cols: usize) -> Result<Vec<Vec<Value>>, ValidationError> {
    let shape_error = |value: &Value| ValidationError::Shape {
        value: value.to_string(),
        rows,
        cols,
    };
    let well_formed = match &value {
        Value::List(matrix) => {
            matrix.len() == rows
                && matrix
                    .iter()
                    .all(|row| matches!(row, Value::List(items) if items.len() == cols))
        }
        _ => false,
    };
    if !well_formed {
        return Err(shape_error(&value));
    }
    match value {
        Value::List(matrix) => Ok(matrix
            .into_iter()
            .filter_map(|row| match row {
                Value::List(items) => Some(items),
                _ => None,
            })
            .collect()),
        other => Err(shape_error(&other)),
    }
}

fn from_rows(matrix: Vec<Vec<Value>>) -> Value {
    Value::List(matrix.into_iter().map(Value::List).collect())
}
