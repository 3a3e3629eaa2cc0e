//! Transform Node
//!
//! A transform carries a single 4x4 float matrix attribute, `xform`. The
//! translation sits in the last column; the upper-left 3x3 block holds the
//! rotation scaled per axis, with each column being one scaled basis vector.

use crate::error::{Error, Result, ValidationError};
use crate::graph::{Node, Session};
use crate::identity::{AttributeId, NodeId};
use crate::kinds::{AttributeKind, NodeSchema};
use crate::value::Value;

/// Below this length a basis vector is treated as collapsed.
const EPSILON: f64 = 1e-9;

/// A view over a Transform node.
///
/// The view holds ids only; every helper resolves the current `xform` value
/// through the session, following connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    node: NodeId,
    xform: AttributeId,
}

impl Transform {
    /// Name of the node kind.
    pub const KIND: &'static str = "Transform";

    /// Name of the matrix attribute.
    pub const XFORM: &'static str = "xform";

    /// The attribute layout of transform nodes.
    pub fn schema() -> NodeSchema {
        NodeSchema::builtin(Self::KIND, &[(Self::XFORM, AttributeKind::xform())])
    }

    /// Create a transform node in `session`. Its matrix starts at zero.
    pub fn create(name: impl Into<String>, session: &mut Session) -> Result<(Node, Transform)> {
        let node = Node::new(&Self::schema(), name, session);
        let view = Self::from_node(&node)?;
        Ok((node, view))
    }

    /// Get a transform view of an existing node.
    ///
    /// Fails if the node was not built from the Transform schema.
    pub fn from_node(node: &Node) -> Result<Self> {
        if node.kind() != Self::KIND {
            return Err(Error::WrongNodeKind {
                node: node.name().to_string(),
                actual: node.kind().to_string(),
                expected: Self::KIND.to_string(),
            });
        }
        Ok(Self {
            node: node.id(),
            xform: node.get_attribute(Self::XFORM)?,
        })
    }

    /// Get the id of the underlying node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Get the id of the `xform` attribute.
    pub fn xform(&self) -> AttributeId {
        self.xform
    }

    /// Resolve the matrix as rows of floats.
    pub fn matrix(&self, session: &Session) -> Result<[[f64; 4]; 4]> {
        let value = session.get(self.xform)?;
        let rows = value.to_matrix().ok_or_else(|| shape_error(&value))?;

        let mut matrix = [[0.0; 4]; 4];
        if rows.len() != 4 {
            return Err(shape_error(&value));
        }
        for (target, row) in matrix.iter_mut().zip(&rows) {
            if row.len() != 4 {
                return Err(shape_error(&value));
            }
            target.copy_from_slice(row);
        }
        Ok(matrix)
    }

    /// Store a matrix on the `xform` attribute.
    pub fn set_matrix(&self, session: &mut Session, matrix: [[f64; 4]; 4]) -> Result<()> {
        session.set(self.xform, matrix)
    }

    /// Translation along x, y and z.
    pub fn translation(&self, session: &Session) -> Result<[f64; 3]> {
        let m = self.matrix(session)?;
        Ok([m[0][3], m[1][3], m[2][3]])
    }

    /// Scale along x, y and z: the length of each basis vector.
    ///
    /// A mirrored matrix (negative determinant) reports a negative x scale.
    pub fn scale(&self, session: &Session) -> Result<[f64; 3]> {
        let m = self.matrix(session)?;
        Ok(signed_scale(&m))
    }

    /// Rotation as XYZ Euler angles in radians.
    ///
    /// The matrix is taken as `Rz * Ry * Rx` once the signed scale from
    /// [`scale`](Self::scale) is divided out, so mirroring is attributed to
    /// the x axis. At gimbal lock the z angle is reported as zero.
    pub fn rotation(&self, session: &Session) -> Result<[f64; 3]> {
        let m = self.matrix(session)?;
        let scale = signed_scale(&m);

        // r[row][col] of the unscaled rotation block
        let mut r = [[0.0; 3]; 3];
        for (row, r_row) in r.iter_mut().enumerate() {
            for (col, cell) in r_row.iter_mut().enumerate() {
                *cell = if scale[col].abs() > EPSILON {
                    m[row][col] / scale[col]
                } else {
                    0.0
                };
            }
        }

        let sin_y = (-r[2][0]).clamp(-1.0, 1.0);
        let y = sin_y.asin();
        let (x, z) = if y.cos() > EPSILON {
            (r[2][1].atan2(r[2][2]), r[1][0].atan2(r[0][0]))
        } else {
            ((-r[1][2]).atan2(r[1][1]), 0.0)
        };
        Ok([x, y, z])
    }
}

fn axis_lengths(m: &[[f64; 4]; 4]) -> [f64; 3] {
    let mut lengths = [0.0; 3];
    for (col, length) in lengths.iter_mut().enumerate() {
        *length = (m[0][col].powi(2) + m[1][col].powi(2) + m[2][col].powi(2)).sqrt();
    }
    lengths
}

/// Axis lengths, with x negated when the 3x3 block flips handedness.
fn signed_scale(m: &[[f64; 4]; 4]) -> [f64; 3] {
    let mut scale = axis_lengths(m);
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    if det < 0.0 {
        scale[0] = -scale[0];
    }
    scale
}

fn shape_error(value: &Value) -> Error {
    ValidationError::Shape {
        value: value.to_string(),
        rows: 4,
        cols: 4,
    }
    .into()
}
