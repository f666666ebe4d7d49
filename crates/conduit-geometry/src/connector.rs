//! Connector point construction.
//!
//! From the first segment's chosen endpoint (`StartBC`) the connecting
//! segment runs at 45 degrees in plan until it reaches the horizontal
//! line through the second segment's endpoint, heading toward that
//! endpoint in x. The closed form differs per quadrant of the delta
//! between the two endpoints; each branch is kept in its reflected form
//! so the four cases can be checked against each other.
//!
//! The connecting segment is planar: its derived point always takes the
//! elevation of `StartBC`.

use serde::{Deserialize, Serialize};

use crate::types::{ConnectorResult, GeometryError, Point3};

/// Sign combination of `(dx, dy)` where `dx = StartBC.x - EndBC.x` and
/// `dy = StartBC.y - EndBC.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// `dx > 0`, `dy > 0`.
    PositivePositive,
    /// `dx > 0`, `dy < 0`.
    PositiveNegative,
    /// `dx < 0`, `dy > 0`.
    NegativePositive,
    /// `dx < 0`, `dy < 0`.
    NegativeNegative,
}

impl Quadrant {
    /// Classify the delta from `end_bc` to `start_bc`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateGeometry`] when either delta is
    /// within `tolerance` of zero: no branch of the construction covers an
    /// axis-aligned pair.
    pub fn classify(
        start_bc: Point3,
        end_bc: Point3,
        tolerance: f64,
    ) -> Result<Self, GeometryError> {
        let dx = start_bc.x - end_bc.x;
        let dy = start_bc.y - end_bc.y;
        if dx.abs() <= tolerance || dy.abs() <= tolerance {
            return Err(GeometryError::DegenerateGeometry(format!(
                "connector endpoints are axis-aligned in plan (dx={dx}, dy={dy})",
            )));
        }
        Ok(match (dx > 0.0, dy > 0.0) {
            (true, true) => Self::PositivePositive,
            (true, false) => Self::PositiveNegative,
            (false, true) => Self::NegativePositive,
            (false, false) => Self::NegativeNegative,
        })
    }
}

/// Result of solving for the connector point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSolution {
    /// Which branch produced the point.
    pub quadrant: Quadrant,
    /// The connecting segment.
    pub connector: ConnectorResult,
}

/// Derive the connecting segment from the nearest endpoint pair.
///
/// `start_bc` is the first segment's endpoint, `end_bc` the second
/// segment's. Returns `[start_bc, new_point]` as a [`ConnectorResult`].
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateGeometry`] when the two points share
/// an x or y coordinate (within `tolerance`).
///
/// # Examples
///
/// ```
/// use conduit_geometry::Point3;
/// use conduit_geometry::connector::{Quadrant, solve_connector};
///
/// let solution = solve_connector(
///     Point3::new(10.0, 0.0, 0.0),
///     Point3::new(20.0, 5.0, 0.0),
///     1e-9,
/// )
/// .unwrap();
/// assert_eq!(solution.quadrant, Quadrant::NegativeNegative);
/// assert_eq!(solution.connector.end_line, Point3::new(15.0, 5.0, 0.0));
/// ```
pub fn solve_connector(
    start_bc: Point3,
    end_bc: Point3,
    tolerance: f64,
) -> Result<ConnectorSolution, GeometryError> {
    let quadrant = Quadrant::classify(start_bc, end_bc, tolerance)?;
    let (s, e) = (start_bc, end_bc);

    let new_point = match quadrant {
        Quadrant::PositivePositive => {
            let f = e.y - (e.x + s.y);
            Point3::new((e.x + s.x) + f, (e.x + s.y) + f, s.z)
        }
        Quadrant::PositiveNegative => {
            let f = (s.y - e.x) - e.y;
            Point3::new((s.x + e.x) + f, (s.y - e.x) - f, s.z)
        }
        Quadrant::NegativePositive => {
            let f = e.y - (s.y - e.x);
            Point3::new((s.x + e.x) - f, (s.y - e.x) + f, s.z)
        }
        Quadrant::NegativeNegative => {
            let f = (s.y + e.x) - e.y;
            Point3::new((s.x + e.x) - f, (s.y + e.x) - f, s.z)
        }
    };

    Ok(ConnectorSolution {
        quadrant,
        connector: ConnectorResult {
            start_line: start_bc,
            end_line: new_point,
        },
    })
}
