//! Shared types for the conduit-join geometry core.

use serde::{Deserialize, Serialize};

use crate::rebind::RebindMode;

/// A 3D point in host model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    /// East-west position.
    pub x: f64,
    /// North-south position.
    pub y: f64,
    /// Elevation.
    pub z: f64,
}

impl Point3 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx.mul_add(dx, dy.mul_add(dy, dz * dz))
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if `other` lies within `tolerance` of this point.
    ///
    /// Used for all endpoint matching.
    #[must_use]
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }

    /// Move this point along `direction` by `distance` units.
    ///
    /// `direction` must be a unit vector.
    #[must_use]
    pub fn offset(self, direction: Vector3, distance: f64) -> Self {
        Self::new(
            direction.x.mul_add(distance, self.x),
            direction.y.mul_add(distance, self.y),
            direction.z.mul_add(distance, self.z),
        )
    }

    /// Vector from this point to `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Vector3 {
        Vector3::new(other.x - self.x, other.y - self.y, other.z - self.z)
    }
}

/// A free 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y.mul_add(other.y, self.z * other.z))
    }

    /// Cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y.mul_add(other.z, -(self.z * other.y)),
            self.z.mul_add(other.x, -(self.x * other.z)),
            self.x.mul_add(other.y, -(self.y * other.x)),
        )
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }
}

/// A straight, directed line between two distinct points.
///
/// Represents a conduit's backing curve. Construct through
/// [`Segment::new`], which rejects coincident endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SegmentProxy", into = "SegmentProxy")]
pub struct Segment {
    start: Point3,
    end: Point3,
}

impl Segment {
    /// Create a segment, rejecting endpoints closer than `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSegment`] if the endpoints coincide
    /// or any coordinate is not finite.
    pub fn new(start: Point3, end: Point3, tolerance: f64) -> Result<Self, GeometryError> {
        let finite = [start.x, start.y, start.z, end.x, end.y, end.z]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            return Err(GeometryError::InvalidSegment(
                "endpoint coordinates must be finite".to_owned(),
            ));
        }
        if start.approx_eq(end, tolerance) {
            return Err(GeometryError::InvalidSegment(format!(
                "start ({}, {}, {}) and end coincide",
                start.x, start.y, start.z,
            )));
        }
        Ok(Self { start, end })
    }

    /// The first endpoint.
    #[must_use]
    pub const fn start(&self) -> Point3 {
        self.start
    }

    /// The second endpoint.
    #[must_use]
    pub const fn end(&self) -> Point3 {
        self.end
    }

    /// Distance between the endpoints.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        // Endpoints are distinct by construction.
        self.start
            .to(self.end)
            .normalized()
            .unwrap_or(Vector3::new(1.0, 0.0, 0.0))
    }

    /// Endpoint selected by `end`.
    #[must_use]
    pub const fn endpoint(&self, end: SegmentEnd) -> Point3 {
        match end {
            SegmentEnd::Start => self.start,
            SegmentEnd::End => self.end,
        }
    }

    /// Perpendicular distance from `point` to the infinite line through
    /// this segment.
    #[must_use]
    pub fn line_distance(&self, point: Point3) -> f64 {
        self.direction().cross(self.start.to(point)).length()
    }

    /// Rebuild the segment from arc-length parameters along its line.
    ///
    /// Parameter 0 is the current start and [`length`](Self::length) the
    /// current end. Parameters outside that range extend the line.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidSegment`] if the resulting bounds
    /// coincide.
    pub fn make_bound(
        &self,
        start_param: f64,
        end_param: f64,
        tolerance: f64,
    ) -> Result<Self, GeometryError> {
        let dir = self.direction();
        Self::new(
            self.start.offset(dir, start_param),
            self.start.offset(dir, end_param),
            tolerance,
        )
    }
}

#[derive(Serialize, Deserialize)]
struct SegmentProxy {
    start: Point3,
    end: Point3,
}

impl From<Segment> for SegmentProxy {
    fn from(segment: Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
        }
    }
}

impl TryFrom<SegmentProxy> for Segment {
    type Error = GeometryError;

    fn try_from(proxy: SegmentProxy) -> Result<Self, Self::Error> {
        Self::new(proxy.start, proxy.end, 0.0)
    }
}

/// One end of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentEnd {
    /// The segment's start point.
    Start,
    /// The segment's end point.
    End,
}

/// Endpoint label on the first segment (`AB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirstEnd {
    /// `StartAB`.
    A,
    /// `EndAB`.
    B,
}

/// Endpoint label on the second segment (`CD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecondEnd {
    /// `StartCD`.
    C,
    /// `EndCD`.
    D,
}

impl From<FirstEnd> for SegmentEnd {
    fn from(end: FirstEnd) -> Self {
        match end {
            FirstEnd::A => Self::Start,
            FirstEnd::B => Self::End,
        }
    }
}

impl From<SecondEnd> for SegmentEnd {
    fn from(end: SecondEnd) -> Self {
        match end {
            SecondEnd::C => Self::Start,
            SecondEnd::D => Self::End,
        }
    }
}

/// One of the four endpoint pairings between the two segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    /// Which endpoint of `AB` this pair uses.
    pub from: FirstEnd,
    /// Which endpoint of `CD` this pair uses.
    pub to: SecondEnd,
    /// The `AB` endpoint.
    pub start_point: Point3,
    /// The `CD` endpoint.
    pub end_point: Point3,
    /// Euclidean distance between the two endpoints.
    pub distance: f64,
}

/// The two endpoints of the new connecting segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorResult {
    /// Endpoint shared with the first segment (`StartBC`).
    pub start_line: Point3,
    /// Derived reflection point where the second segment is met (`EndBC`).
    pub end_line: Point3,
}

impl ConnectorResult {
    /// Length of the connecting segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start_line.distance(self.end_line)
    }
}

/// Configuration for the connection planner.
///
/// # Tolerance
///
/// `tolerance` is an absolute distance in model units. It governs
/// endpoint identity (connection-point selection), coincident segment
/// endpoints, and tie detection in the quadrant and re-bound case
/// analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Absolute comparison tolerance in model units.
    pub tolerance: f64,

    /// How the second segment is reshaped to meet the connector.
    pub rebind_mode: RebindMode,
}

impl GeometryConfig {
    /// Default absolute tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    /// Default rebind mode.
    pub const DEFAULT_REBIND_MODE: RebindMode = RebindMode::Rebound;

    /// Check the configuration for values the planner cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidConfig`] if `tolerance` is negative
    /// or not finite.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(GeometryError::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance,
            )));
        }
        Ok(())
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            rebind_mode: Self::DEFAULT_REBIND_MODE,
        }
    }
}

/// Errors raised by the geometry core.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum GeometryError {
    /// A segment's endpoints coincide or are not finite.
    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    /// No branch of a case analysis covers the input (axis-aligned
    /// deltas or tied coordinates).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Planner configuration is invalid.
    #[error("invalid geometry configuration: {0}")]
    InvalidConfig(String),
}
