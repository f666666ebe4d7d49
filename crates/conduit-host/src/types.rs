//! Shared types for the host document boundary.

use std::fmt;

use conduit_geometry::{GeometryError, Point3, Segment};
use serde::{Deserialize, Serialize};

/// Identity of an element in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a conduit type (family type) in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConduitTypeId(pub u64);

/// Identity of a reference level in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u64);

/// An element's location curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    /// A bounded straight line.
    Line(Segment),

    /// A circular arc through three points (a bent conduit run).
    ///
    /// Arcs are valid host geometry but cannot be joined.
    Arc {
        /// First endpoint.
        start: Point3,
        /// A point on the arc between the endpoints.
        mid: Point3,
        /// Second endpoint.
        end: Point3,
    },
}

/// A terminal connection point on an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Element exposing the connector.
    pub owner: ElementId,
    /// Position of the connector within its owner's connector set.
    pub index: usize,
    /// Location in model coordinates.
    pub origin: Point3,
    /// Whether a fitting is already attached here.
    pub connected: bool,
}

/// Errors raised by the connect command and host collaborators.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum CommandError {
    /// The command's inputs do not describe two straight segments.
    #[error("invalid input: {0}")]
    InputShape(String),

    /// An element exposed no connection points.
    #[error("element {0} has no connectors")]
    NoConnectors(ElementId),

    /// An element is neither an MEP curve nor a fitting.
    #[error("element {0} is neither an MEP curve nor a fitting")]
    NotConnectable(ElementId),

    /// The document lacks a default the command needs.
    #[error("document has no {0}")]
    MissingDefault(String),

    /// The host rejected a document operation.
    #[error("host operation failed: {0}")]
    Host(String),

    /// The geometry core rejected the segments.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_id_display() {
        assert_eq!(ElementId(42).to_string(), "#42");
    }

    #[test]
    fn geometry_error_converts() {
        let err: CommandError = GeometryError::DegenerateGeometry("tie".to_owned()).into();
        assert_eq!(err.to_string(), "degenerate geometry: tie");
    }

    #[test]
    fn no_connectors_message_names_element() {
        let err = CommandError::NoConnectors(ElementId(7));
        assert_eq!(err.to_string(), "element #7 has no connectors");
    }
}
