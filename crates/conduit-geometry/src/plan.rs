//! The full connection procedure and its diagnostics.
//!
//! [`plan_connection`] runs the four geometry steps in order and keeps
//! every intermediate result on the returned [`ConnectionPlan`], so a
//! caller can both apply the plan and explain how it was reached.

use serde::{Deserialize, Serialize};

use crate::attach::{Attachments, select_attachments};
use crate::connector::{Quadrant, solve_connector};
use crate::nearest::{candidate_pairs, nearest_endpoints};
use crate::rebind::{self, RebindDetail, RebindMode, RebindOutcome};
use crate::types::{
    CandidatePair, ConnectorResult, GeometryConfig, GeometryError, Point3, SegmentEnd, Segment,
};

/// Everything needed to join two segments, plus how it was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPlan {
    /// The first segment (`AB`) as given.
    pub first: Segment,
    /// The second segment (`CD`) as given.
    pub second: Segment,
    /// All four endpoint pairings in enumeration order.
    pub candidates: [CandidatePair; 4],
    /// The winning pairing.
    pub nearest: CandidatePair,
    /// Branch of the connector construction.
    pub quadrant: Quadrant,
    /// The new connecting segment.
    pub connector: ConnectorResult,
    /// Which rebind strategy was applied.
    pub mode: RebindMode,
    /// Replacement geometry for the second segment.
    pub rebind: RebindOutcome,
    /// Elbow locations.
    pub attachments: Attachments,
}

/// Plan the connection between `first` and `second`.
///
/// # Steps
///
/// 1. Rank the four endpoint pairings and keep the nearest.
/// 2. Solve the connector point from the nearest pair.
/// 3. Reshape the second segment per `config.rebind_mode`.
/// 4. Choose the elbow locations.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidConfig`] if `config` fails validation,
/// and [`GeometryError::DegenerateGeometry`] or
/// [`GeometryError::InvalidSegment`] from the individual steps.
///
/// # Examples
///
/// ```
/// use conduit_geometry::{GeometryConfig, Point3, Segment, plan_connection};
///
/// let ab = Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0), 1e-9).unwrap();
/// let cd = Segment::new(Point3::new(20.0, 5.0, 0.0), Point3::new(30.0, 5.0, 0.0), 1e-9).unwrap();
/// let plan = plan_connection(&ab, &cd, &GeometryConfig::default()).unwrap();
/// assert_eq!(plan.connector.start_line, Point3::new(10.0, 0.0, 0.0));
/// assert_eq!(plan.rebind.segment.start(), Point3::new(15.0, 5.0, 0.0));
/// ```
pub fn plan_connection(
    first: &Segment,
    second: &Segment,
    config: &GeometryConfig,
) -> Result<ConnectionPlan, GeometryError> {
    config.validate()?;
    let tolerance = config.tolerance;

    // 1. Nearest endpoints.
    let candidates = candidate_pairs(first, second);
    let nearest = nearest_endpoints(first, second);

    // 2. Connector point.
    let solution = solve_connector(nearest.start_point, nearest.end_point, tolerance)?;
    let connector = solution.connector;

    // 3. Second-segment geometry.
    let rebind = match config.rebind_mode {
        RebindMode::Rebound => rebind::rebound(second, &connector, tolerance)?,
        RebindMode::Trim => rebind::trim(first, second, &nearest, &connector, tolerance)?,
    };

    // 4. Elbow locations.
    let attachments = select_attachments(first, &connector, tolerance)?;

    Ok(ConnectionPlan {
        first: *first,
        second: *second,
        candidates,
        nearest,
        quadrant: solution.quadrant,
        connector,
        mode: config.rebind_mode,
        rebind,
        attachments,
    })
}

fn fmt_point(p: Point3) -> String {
    format!("({:.4}, {:.4}, {:.4})", p.x, p.y, p.z)
}

const fn end_name(end: SegmentEnd) -> &'static str {
    match end {
        SegmentEnd::Start => "start",
        SegmentEnd::End => "end",
    }
}

impl ConnectionPlan {
    /// Format the plan as a human-readable multi-line report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Connection Plan\n{}", "=".repeat(60)));
        lines.push(format!(
            "First segment:  {} -> {}",
            fmt_point(self.first.start()),
            fmt_point(self.first.end()),
        ));
        lines.push(format!(
            "Second segment: {} -> {}",
            fmt_point(self.second.start()),
            fmt_point(self.second.end()),
        ));
        lines.push(String::new());

        lines.push(format!("{:<8} {:>12}", "Pair", "Distance"));
        lines.push("-".repeat(24));
        for c in &self.candidates {
            let marker = if c == &self.nearest { "  <" } else { "" };
            let label = format!("{:?}-{:?}", c.from, c.to);
            lines.push(format!("{label:<8} {:>12.4}{marker}", c.distance));
        }
        lines.push(String::new());

        lines.push(format!("Quadrant: {:?}", self.quadrant));
        lines.push(format!(
            "Connector: {} -> {} (length {:.4})",
            fmt_point(self.connector.start_line),
            fmt_point(self.connector.end_line),
            self.connector.length(),
        ));

        match self.rebind.detail {
            RebindDetail::Rebound(row) => {
                lines.push(format!("Rebind: re-bound, row {row:?}"));
            }
            RebindDetail::Trim(legs) => {
                lines.push(format!(
                    "Rebind: trim, leg1={:.4} leg2={:.4} hypotenuse={:.4} offset={:.4}",
                    legs.leg1, legs.leg2, legs.hypotenuse, legs.offset,
                ));
            }
        }
        lines.push(format!(
            "New second segment: {} -> {}",
            fmt_point(self.rebind.segment.start()),
            fmt_point(self.rebind.segment.end()),
        ));
        lines.push(format!(
            "Elbows: first segment {} {}, second segment {}",
            end_name(self.attachments.first_end),
            fmt_point(self.attachments.first),
            fmt_point(self.attachments.second),
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rebind::ReboundRow;
    use crate::types::{FirstEnd, SecondEnd};

    fn seg(a: (f64, f64, f64), b: (f64, f64, f64)) -> Segment {
        Segment::new(
            Point3::new(a.0, a.1, a.2),
            Point3::new(b.0, b.1, b.2),
            1e-9,
        )
        .unwrap()
    }

    #[test]
    fn parallel_offset_runs_rebound() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((20.0, 5.0, 0.0), (30.0, 5.0, 0.0));
        let plan = plan_connection(&ab, &cd, &GeometryConfig::default()).unwrap();

        assert_eq!((plan.nearest.from, plan.nearest.to), (FirstEnd::B, SecondEnd::C));
        assert_eq!(plan.quadrant, Quadrant::NegativeNegative);
        assert_eq!(plan.connector.end_line, Point3::new(15.0, 5.0, 0.0));
        assert_eq!(
            plan.rebind.detail,
            RebindDetail::Rebound(ReboundRow::KeepEndAscending)
        );
        assert_eq!(plan.rebind.segment.start(), Point3::new(15.0, 5.0, 0.0));
        assert_eq!(plan.rebind.segment.end(), Point3::new(30.0, 5.0, 0.0));
        assert_eq!(plan.attachments.first_end, SegmentEnd::End);
        assert_eq!(plan.attachments.second, plan.connector.end_line);
    }

    #[test]
    fn trim_mode_uses_nearest_end_of_second_segment() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((30.0, 5.0, 0.0), (20.0, 5.0, 0.0));
        let config = GeometryConfig {
            rebind_mode: RebindMode::Trim,
            ..GeometryConfig::default()
        };
        let plan = plan_connection(&ab, &cd, &config).unwrap();
        assert_eq!(plan.nearest.to, SecondEnd::D);
        assert_eq!(plan.mode, RebindMode::Trim);
        assert!(matches!(plan.rebind.detail, RebindDetail::Trim(_)));
        // The start of CD is never moved when D is attached.
        assert_eq!(plan.rebind.segment.start(), cd.start());
        assert!(
            plan.rebind
                .segment
                .end()
                .approx_eq(plan.connector.end_line, 1e-9)
        );
    }

    #[test]
    fn axis_aligned_pair_is_degenerate() {
        // Collinear along x: nearest endpoints share y.
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((20.0, 0.0, 0.0), (30.0, 0.0, 0.0));
        let result = plan_connection(&ab, &cd, &GeometryConfig::default());
        assert!(matches!(result, Err(GeometryError::DegenerateGeometry(_))));
    }

    #[test]
    fn invalid_config_is_rejected_before_planning() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((20.0, 5.0, 0.0), (30.0, 5.0, 0.0));
        let config = GeometryConfig {
            tolerance: f64::NAN,
            ..GeometryConfig::default()
        };
        let result = plan_connection(&ab, &cd, &config);
        assert!(matches!(result, Err(GeometryError::InvalidConfig(_))));
    }

    #[test]
    fn planning_is_deterministic() {
        let ab = seg((1.25, -3.0, 2.0), (8.0, 4.5, 2.0));
        let cd = seg((14.0, 11.0, 2.0), (25.0, 11.0, 2.0));
        let config = GeometryConfig::default();
        assert_eq!(
            plan_connection(&ab, &cd, &config).unwrap(),
            plan_connection(&ab, &cd, &config).unwrap()
        );
    }

    #[test]
    fn report_mentions_every_step() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((20.0, 5.0, 0.0), (30.0, 5.0, 0.0));
        let report = plan_connection(&ab, &cd, &GeometryConfig::default())
            .unwrap()
            .report();
        assert!(report.contains("Connection Plan"));
        assert!(report.contains("B-C"));
        assert!(report.contains("NegativeNegative"));
        assert!(report.contains("KeepEndAscending"));
        assert!(report.contains("Elbows"));
    }

    #[test]
    fn plan_serializes_to_json() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((20.0, 5.0, 0.0), (30.0, 5.0, 0.0));
        let plan = plan_connection(&ab, &cd, &GeometryConfig::default()).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let back: ConnectionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.quadrant, plan.quadrant);
        assert_eq!(back.nearest.to, plan.nearest.to);
        assert_eq!(back.rebind.detail, plan.rebind.detail);
        assert!(
            back.connector
                .end_line
                .approx_eq(plan.connector.end_line, 1e-12)
        );
    }
}
