//! Where the connecting segment attaches to each original segment.

use serde::{Deserialize, Serialize};

use crate::types::{ConnectorResult, GeometryError, Point3, SegmentEnd, Segment};

/// Attachment points for the two elbow fittings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attachments {
    /// Endpoint of the first segment the connector starts from.
    pub first_end: SegmentEnd,
    /// Location of the first elbow.
    pub first: Point3,
    /// Location of the second elbow: always the connector's derived point,
    /// since the second segment is reshaped to end there.
    pub second: Point3,
}

/// Pick the attachment points for the connector.
///
/// The first segment's endpoint is identified by tolerance rather than
/// exact coordinate equality. When both endpoints match, the start wins.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateGeometry`] if the connector does not
/// start on either endpoint of `ab`.
pub fn select_attachments(
    ab: &Segment,
    connector: &ConnectorResult,
    tolerance: f64,
) -> Result<Attachments, GeometryError> {
    let start_bc = connector.start_line;
    let first_end = if start_bc.approx_eq(ab.start(), tolerance) {
        SegmentEnd::Start
    } else if start_bc.approx_eq(ab.end(), tolerance) {
        SegmentEnd::End
    } else {
        return Err(GeometryError::DegenerateGeometry(format!(
            "connector start ({}, {}, {}) is not an endpoint of the first segment",
            start_bc.x, start_bc.y, start_bc.z,
        )));
    };

    Ok(Attachments {
        first_end,
        first: ab.endpoint(first_end),
        second: connector.end_line,
    })
}
