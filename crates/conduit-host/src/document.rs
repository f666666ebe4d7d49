//! Collaborator traits the connect command needs from a host document.
//!
//! A CAD host provides element geometry, element creation, connector
//! topology and transactions. Each concern is its own trait so adapters
//! can be written against only what they use; [`HostDocument`] bundles
//! all four for the command.

use conduit_geometry::{Point3, Segment};

use crate::types::{CommandError, ConduitTypeId, Connector, Curve, ElementId, LevelId};

/// Read access to elements and document defaults.
pub trait ElementSource {
    /// Currently selected element ids, in selection order.
    fn selection(&self) -> Vec<ElementId>;

    /// Location curve of an element.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InputShape`] if the element does not exist
    /// or has no location curve.
    fn curve(&self, id: ElementId) -> Result<Curve, CommandError>;

    /// Diameter (cross-section) of a conduit element.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InputShape`] if the element is not a conduit.
    fn diameter(&self, id: ElementId) -> Result<f64, CommandError>;

    /// Conduit type used for new conduits (the first one in the document).
    fn conduit_type(&self) -> Option<ConduitTypeId>;

    /// Reference level used for new conduits (the first one in the document).
    fn level(&self) -> Option<LevelId>;
}

/// Element creation and modification.
pub trait ElementFactory {
    /// Create a straight conduit along `segment`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Host`] if the host refuses the element.
    fn create_conduit(
        &mut self,
        conduit_type: ConduitTypeId,
        segment: Segment,
        level: LevelId,
    ) -> Result<ElementId, CommandError>;

    /// Set a conduit's diameter.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InputShape`] if the element is not a conduit.
    fn set_diameter(&mut self, id: ElementId, diameter: f64) -> Result<(), CommandError>;

    /// Replace a conduit's location line.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InputShape`] if the element is not a conduit.
    fn set_curve(&mut self, id: ElementId, segment: Segment) -> Result<(), CommandError>;
}

/// Connector topology between elements.
pub trait ConnectorGraph {
    /// Terminal connection points of an element, in host enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotConnectable`] if the element is neither
    /// an MEP curve nor a fitting.
    fn connectors(&self, id: ElementId) -> Result<Vec<Connector>, CommandError>;

    /// Join two connectors with a new elbow fitting.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Host`] if either connector is unknown or
    /// already in use.
    fn create_elbow(&mut self, a: &Connector, b: &Connector) -> Result<ElementId, CommandError>;
}

/// Scoped mutation of the document.
pub trait TransactionScope {
    /// Run `f` inside a named transaction.
    ///
    /// Changes made by `f` are committed when it returns `Ok` and
    /// discarded when it returns `Err`. Transactions nest: an outer
    /// rollback discards inner commits.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    fn transaction<T, F>(&mut self, name: &str, f: F) -> Result<T, CommandError>
    where
        F: FnOnce(&mut Self) -> Result<T, CommandError>;
}

/// Everything the connect command needs from a host.
pub trait HostDocument: ElementSource + ElementFactory + ConnectorGraph + TransactionScope {}

impl<T> HostDocument for T where T: ElementSource + ElementFactory + ConnectorGraph + TransactionScope
{}

/// Find the connector closest to `location`.
///
/// Ties resolve to the first connector in enumeration order. Returns
/// `None` for an empty set.
#[must_use]
pub fn nearest_connector(connectors: &[Connector], location: Point3) -> Option<Connector> {
    let mut best: Option<(Connector, f64)> = None;
    for c in connectors {
        let d = c.origin.distance(location);
        if best.is_none_or(|(_, min)| d < min) {
            best = Some((*c, d));
        }
    }
    best.map(|(c, _)| c)
}

/// Two connectors an elbow will join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElbowRequest {
    /// Where the elbow is wanted.
    pub location: Point3,
    /// Connector on the existing element.
    pub existing: Connector,
    /// Connector on the new connecting conduit.
    pub connecting: Connector,
}

/// Resolve the connectors of `existing` and `connecting` nearest to
/// `location`, without creating anything.
///
/// # Errors
///
/// Returns [`CommandError::NoConnectors`] if either element exposes no
/// connectors, or [`CommandError::NotConnectable`] if either element
/// cannot carry connectors at all.
pub fn resolve_elbow<G: ConnectorGraph + ?Sized>(
    graph: &G,
    location: Point3,
    existing: ElementId,
    connecting: ElementId,
) -> Result<ElbowRequest, CommandError> {
    let existing_connector = nearest_connector(&graph.connectors(existing)?, location)
        .ok_or(CommandError::NoConnectors(existing))?;
    let connecting_connector = nearest_connector(&graph.connectors(connecting)?, location)
        .ok_or(CommandError::NoConnectors(connecting))?;
    Ok(ElbowRequest {
        location,
        existing: existing_connector,
        connecting: connecting_connector,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn connector(index: usize, x: f64) -> Connector {
        Connector {
            owner: ElementId(1),
            index,
            origin: Point3::new(x, 0.0, 0.0),
            connected: false,
        }
    }

    #[test]
    fn nearest_connector_empty_is_none() {
        assert!(nearest_connector(&[], Point3::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_connector_picks_closest() {
        let set = [connector(0, 0.0), connector(1, 10.0)];
        let c = nearest_connector(&set, Point3::new(9.0, 1.0, 0.0)).unwrap();
        assert_eq!(c.index, 1);
    }

    #[test]
    fn nearest_connector_tie_keeps_first() {
        let set = [connector(0, -1.0), connector(1, 1.0)];
        let c = nearest_connector(&set, Point3::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(c.index, 0);
    }
}
