//! Attribute Values
//!
//! Every attribute stores a [`Value`]. The set of representations is closed:
//! strings, floats, integers and lists. A matrix is a list of row lists, so
//! the same type carries both raw user input (e.g. a nested list of
//! integers) and the normalized result of validating it against a kind.

use std::fmt;

/// A value held by an attribute or passed to [`Session::set`](crate::graph::Session::set).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

impl Value {
    /// Build a float matrix value from rows of floats.
    pub fn matrix<R, I>(rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = f64>,
    {
        Value::List(
            rows.into_iter()
                .map(|row| Value::List(row.into_iter().map(Value::Float).collect()))
                .collect(),
        )
    }

    /// Build a `rows` by `cols` matrix filled with `item`.
    pub fn filled(rows: usize, cols: usize, item: Value) -> Self {
        Value::List(vec![Value::List(vec![item; cols]); rows])
    }

    /// Get the value as a float, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert a list of numeric row lists to nested floats.
    ///
    /// Returns `None` if the value is not a list of lists of numbers. Rows
    /// may have different lengths.
    pub fn to_matrix(&self) -> Option<Vec<Vec<f64>>> {
        self.as_list()?
            .iter()
            .map(|row| row.as_list()?.iter().map(Value::as_f64).collect())
            .collect()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write_float(f, *v),
            Value::String(v) => f.write_str(v),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Value::String(s) => write_quoted(f, s)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}

/// Shortest round-trip digits, switching to exponent form outside
/// `[1e-4, 1e16)` and keeping a decimal point on integral values.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("nan");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{:e}", v);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if v != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    } else if v.fract() == 0.0 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

/// Quote a string the way a list repr does: single quotes unless the text
/// holds a single quote and no double quote.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    write!(f, "{}", quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "{}", quote)
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
