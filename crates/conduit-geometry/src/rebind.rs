//! Reshaping the second segment so it meets the connector.
//!
//! Two strategies exist. [`RebindMode::Rebound`] picks new bounds for the
//! second segment from a table of x-coordinate comparisons.
//! [`RebindMode::Trim`] moves the attached end of the second segment's
//! line by an exact offset derived from a right triangle spanned by the
//! nearest endpoint pair and the first segment's line.

use serde::{Deserialize, Serialize};

use crate::types::{CandidatePair, ConnectorResult, GeometryError, SecondEnd, Segment};

/// Selects how the second segment is reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RebindMode {
    /// Replace the second segment with one of four endpoint combinations
    /// chosen by comparing x coordinates.
    #[default]
    Rebound,

    /// Shift the attached end of the second segment's line by the
    /// difference between the two legs of the connector triangle.
    Trim,
}

/// Row of the re-bound table that matched.
///
/// Rows are evaluated in order; the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReboundRow {
    /// `StartCD.x > EndCD.x` and `StartCD.x > EndBC.x` → `(StartCD, EndBC)`.
    KeepStartDescending,
    /// `StartCD.x < EndCD.x` and `EndCD.x > EndBC.x` → `(EndBC, EndCD)`.
    KeepEndAscending,
    /// `StartCD.x > EndCD.x` and `StartCD.x < EndBC.x` → `(EndCD, EndBC)`.
    KeepEndDescending,
    /// `StartCD.x < EndCD.x` and `StartCD.x < EndBC.x` → `(StartCD, EndBC)`.
    KeepStartAscending,
}

/// Right-triangle measurements used by [`RebindMode::Trim`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimLegs {
    /// Perpendicular distance from the first segment's infinite line to
    /// the connector's derived point.
    pub leg1: f64,
    /// Run along the first segment's line between the nearest endpoints.
    pub leg2: f64,
    /// Distance between the nearest endpoints.
    pub hypotenuse: f64,
    /// Parameter offset applied to the attached end, `-(leg2 - leg1)`.
    pub offset: f64,
}

/// How the new second-segment geometry was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RebindDetail {
    /// Re-bound mode with the matching table row.
    Rebound(ReboundRow),
    /// Trim mode with the triangle it was computed from.
    Trim(TrimLegs),
}

/// New geometry for the second segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebindOutcome {
    /// Replacement backing line for the second segment.
    pub segment: Segment,
    /// Which branch produced it.
    pub detail: RebindDetail,
}

/// Strictly greater by more than `tolerance`.
fn gt(a: f64, b: f64, tolerance: f64) -> bool {
    a - b > tolerance
}

/// Strictly less by more than `tolerance`.
fn lt(a: f64, b: f64, tolerance: f64) -> bool {
    b - a > tolerance
}

/// Choose new bounds for `cd` by comparing x coordinates of its
/// endpoints against the connector's derived point.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateGeometry`] when `cd` is vertical in
/// plan x (its endpoints share an x coordinate) or when `EndBC.x` ties
/// with `StartCD.x` on a descending segment, since no row covers either.
/// Returns [`GeometryError::InvalidSegment`] if the chosen bounds coincide.
pub fn rebound(
    cd: &Segment,
    connector: &ConnectorResult,
    tolerance: f64,
) -> Result<RebindOutcome, GeometryError> {
    let start_cd = cd.start();
    let end_cd = cd.end();
    let end_bc = connector.end_line;
    let (s, e, bc) = (start_cd.x, end_cd.x, end_bc.x);

    if !gt(s, e, tolerance) && !lt(s, e, tolerance) {
        return Err(GeometryError::DegenerateGeometry(format!(
            "second segment endpoints share x = {s}; re-bound table has no row for it",
        )));
    }

    let (row, from, to) = if gt(s, e, tolerance) && gt(s, bc, tolerance) {
        (ReboundRow::KeepStartDescending, start_cd, end_bc)
    } else if lt(s, e, tolerance) && gt(e, bc, tolerance) {
        (ReboundRow::KeepEndAscending, end_bc, end_cd)
    } else if gt(s, e, tolerance) && lt(s, bc, tolerance) {
        (ReboundRow::KeepEndDescending, end_cd, end_bc)
    } else if lt(s, e, tolerance) && lt(s, bc, tolerance) {
        (ReboundRow::KeepStartAscending, start_cd, end_bc)
    } else {
        return Err(GeometryError::DegenerateGeometry(format!(
            "connector x = {bc} ties with second segment start x = {s}",
        )));
    };

    Ok(RebindOutcome {
        segment: Segment::new(from, to, tolerance)?,
        detail: RebindDetail::Rebound(row),
    })
}

/// Compute the exact trim of `cd` so its attached end reaches the
/// connector.
///
/// The first segment's line is treated as infinite. `leg1` is the
/// perpendicular distance from it to the connector's derived point, the
/// hypotenuse is the distance between the `nearest` endpoint pair and
/// `leg2 = sqrt(h² - leg1²)`. The end of `cd` named by `nearest.to` has
/// its arc-length parameter moved outward by `leg2 - leg1`, which is how
/// far that end sits from the derived point.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateGeometry`] if `leg1` exceeds the
/// hypotenuse by more than `tolerance`, meaning the connector does not
/// start on the first segment's line.
/// Returns [`GeometryError::InvalidSegment`] if the trim collapses `cd`.
///
/// # Examples
///
/// ```
/// use conduit_geometry::{Point3, Segment};
/// use conduit_geometry::connector::solve_connector;
/// use conduit_geometry::nearest::nearest_endpoints;
/// use conduit_geometry::rebind::trim;
///
/// let ab = Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0), 1e-9).unwrap();
/// let cd = Segment::new(Point3::new(20.0, 5.0, 0.0), Point3::new(30.0, 5.0, 0.0), 1e-9).unwrap();
/// let nearest = nearest_endpoints(&ab, &cd);
/// let connector = solve_connector(nearest.start_point, nearest.end_point, 1e-9)
///     .unwrap()
///     .connector;
/// let outcome = trim(&ab, &cd, &nearest, &connector, 1e-9).unwrap();
/// assert!(outcome.segment.start().approx_eq(Point3::new(15.0, 5.0, 0.0), 1e-9));
/// assert!(outcome.segment.end().approx_eq(Point3::new(30.0, 5.0, 0.0), 1e-9));
/// ```
pub fn trim(
    ab: &Segment,
    cd: &Segment,
    nearest: &CandidatePair,
    connector: &ConnectorResult,
    tolerance: f64,
) -> Result<RebindOutcome, GeometryError> {
    let leg1 = ab.line_distance(connector.end_line);
    let hypotenuse = nearest.start_point.distance(nearest.end_point);

    if leg1 - hypotenuse > tolerance {
        return Err(GeometryError::DegenerateGeometry(format!(
            "connector start is off the first segment's line (leg1={leg1}, hypotenuse={hypotenuse})",
        )));
    }

    let radicand = hypotenuse.mul_add(hypotenuse, -(leg1 * leg1)).max(0.0);
    let leg2 = radicand.sqrt();
    let offset = -(leg2 - leg1);

    let length = cd.length();
    let segment = match nearest.to {
        SecondEnd::C => cd.make_bound(offset, length, tolerance)?,
        SecondEnd::D => cd.make_bound(0.0, length - offset, tolerance)?,
    };

    Ok(RebindOutcome {
        segment,
        detail: RebindDetail::Trim(TrimLegs {
            leg1,
            leg2,
            hypotenuse,
            offset,
        }),
    })
}
