//! conduit-geometry: Pure geometry for joining two conduit runs (sans-IO).
//!
//! Given two straight segments, computes the connecting segment between
//! their nearest endpoints, the replacement geometry for the second
//! segment, and where elbow fittings belong:
//! nearest endpoints -> connector point -> rebind -> attachments.
//!
//! This crate has **no I/O dependencies** and holds no state between
//! calls. Host document access lives in `conduit-host`.

pub mod attach;
pub mod connector;
pub mod nearest;
pub mod plan;
pub mod rebind;
pub mod types;

pub use attach::Attachments;
pub use connector::Quadrant;
pub use plan::{ConnectionPlan, plan_connection};
pub use rebind::{RebindDetail, RebindMode, RebindOutcome, ReboundRow, TrimLegs};
pub use types::{
    CandidatePair, ConnectorResult, FirstEnd, GeometryConfig, GeometryError, Point3, SecondEnd,
    Segment, SegmentEnd, Vector3,
};
