//! In-memory host document.
//!
//! [`MemoryDocument`] implements every collaborator trait over a plain
//! [`Scene`] value. Transactions snapshot the scene on entry and restore
//! it when the body fails, which gives the same all-or-nothing behavior
//! a CAD host's transaction manager provides.
//!
//! Scenes serialize to JSON so a document can be loaded, mutated by the
//! command and written back by the CLI.

use std::collections::BTreeMap;

use conduit_geometry::{GeometryConfig, Point3, Segment};
use serde::{Deserialize, Serialize};

use crate::document::{ConnectorGraph, ElementFactory, ElementSource, TransactionScope};
use crate::types::{CommandError, ConduitTypeId, Connector, Curve, ElementId, LevelId};

/// A conduit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConduitElement {
    /// Location curve.
    pub curve: Curve,
    /// Outside diameter in model units.
    pub diameter: f64,
    /// Conduit type, when known.
    #[serde(default)]
    pub conduit_type: Option<ConduitTypeId>,
    /// Reference level, when known.
    #[serde(default)]
    pub level: Option<LevelId>,
    /// Indices of connectors (0 = start, 1 = end) that carry a fitting.
    #[serde(default)]
    pub connected: Vec<usize>,
}

/// A fitting joining two connectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingElement {
    /// Connector locations, one per joined connector.
    pub ports: Vec<Point3>,
    /// The connectors this fitting joins, as `(owner, index)`.
    pub joins: Vec<(ElementId, usize)>,
}

/// An element in a [`Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// A conduit run (an MEP curve).
    Conduit(ConduitElement),
    /// A fitting such as an elbow.
    Fitting(FittingElement),
    /// Any other element (walls, annotations, ...).
    Other {
        /// Host category name.
        category: String,
    },
}

impl Element {
    /// Shorthand for an unconnected conduit with no type or level.
    #[must_use]
    pub const fn conduit(curve: Curve, diameter: f64) -> Self {
        Self::Conduit(ConduitElement {
            curve,
            diameter,
            conduit_type: None,
            level: None,
            connected: Vec::new(),
        })
    }
}

/// Serializable document contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Available conduit types; the first is used for new conduits.
    pub conduit_types: Vec<ConduitTypeId>,
    /// Available levels; the first is used for new conduits.
    pub levels: Vec<LevelId>,
    /// Current selection in selection order.
    pub selection: Vec<ElementId>,
    /// All elements by id.
    pub elements: BTreeMap<ElementId, Element>,
}

/// Whether a transaction kept its changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// Changes were kept.
    Committed,
    /// Changes were discarded.
    RolledBack,
}

/// One finished transaction, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction name.
    pub name: String,
    /// What happened to its changes.
    pub outcome: TransactionOutcome,
}

/// A host document held entirely in memory.
///
/// Elbows are only accepted between connectors that coincide within the
/// document's tolerance, as a CAD host requires when fabricating a
/// fitting.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    scene: Scene,
    journal: Vec<TransactionRecord>,
    tolerance: f64,
}

impl MemoryDocument {
    /// Wrap a scene, matching connectors with
    /// [`GeometryConfig::DEFAULT_TOLERANCE`].
    #[must_use]
    pub const fn new(scene: Scene) -> Self {
        Self {
            scene,
            journal: Vec::new(),
            tolerance: GeometryConfig::DEFAULT_TOLERANCE,
        }
    }

    /// Use `tolerance` when checking that elbow connectors coincide.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Distance within which two connectors may be joined.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Current document contents.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Consume the document and return its contents.
    #[must_use]
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Finished transactions, innermost first.
    #[must_use]
    pub fn journal(&self) -> &[TransactionRecord] {
        &self.journal
    }

    /// Look up an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.scene.elements.get(&id)
    }

    fn conduit(&self, id: ElementId) -> Result<&ConduitElement, CommandError> {
        match self.scene.elements.get(&id) {
            Some(Element::Conduit(conduit)) => Ok(conduit),
            Some(_) => Err(CommandError::InputShape(format!(
                "element {id} is not a conduit",
            ))),
            None => Err(CommandError::InputShape(format!(
                "element {id} does not exist",
            ))),
        }
    }

    fn conduit_mut(&mut self, id: ElementId) -> Result<&mut ConduitElement, CommandError> {
        match self.scene.elements.get_mut(&id) {
            Some(Element::Conduit(conduit)) => Ok(conduit),
            Some(_) => Err(CommandError::InputShape(format!(
                "element {id} is not a conduit",
            ))),
            None => Err(CommandError::InputShape(format!(
                "element {id} does not exist",
            ))),
        }
    }

    fn next_id(&self) -> ElementId {
        ElementId(
            self.scene
                .elements
                .keys()
                .next_back()
                .map_or(1, |id| id.0 + 1),
        )
    }

    /// Mark `connector` as carrying a fitting.
    fn attach(&mut self, connector: &Connector) -> Result<(), CommandError> {
        let current = self
            .connectors(connector.owner)?
            .into_iter()
            .find(|c| c.index == connector.index)
            .ok_or_else(|| {
                CommandError::Host(format!(
                    "element {} has no connector {}",
                    connector.owner, connector.index,
                ))
            })?;
        if current.connected {
            return Err(CommandError::Host(format!(
                "connector {} of element {} is already connected",
                connector.index, connector.owner,
            )));
        }
        match self.scene.elements.get_mut(&connector.owner) {
            Some(Element::Conduit(conduit)) => {
                conduit.connected.push(connector.index);
                conduit.connected.sort_unstable();
                Ok(())
            }
            _ => Err(CommandError::Host(format!(
                "only conduit connectors can take a new fitting (element {})",
                connector.owner,
            ))),
        }
    }
}

const fn curve_ends(curve: &Curve) -> [Point3; 2] {
    match curve {
        Curve::Line(segment) => [segment.start(), segment.end()],
        Curve::Arc { start, end, .. } => [*start, *end],
    }
}

impl ElementSource for MemoryDocument {
    fn selection(&self) -> Vec<ElementId> {
        self.scene.selection.clone()
    }

    fn curve(&self, id: ElementId) -> Result<Curve, CommandError> {
        self.conduit(id).map(|c| c.curve)
    }

    fn diameter(&self, id: ElementId) -> Result<f64, CommandError> {
        self.conduit(id).map(|c| c.diameter)
    }

    fn conduit_type(&self) -> Option<ConduitTypeId> {
        self.scene.conduit_types.first().copied()
    }

    fn level(&self) -> Option<LevelId> {
        self.scene.levels.first().copied()
    }
}

impl ElementFactory for MemoryDocument {
    fn create_conduit(
        &mut self,
        conduit_type: ConduitTypeId,
        segment: Segment,
        level: LevelId,
    ) -> Result<ElementId, CommandError> {
        let id = self.next_id();
        self.scene.elements.insert(
            id,
            Element::Conduit(ConduitElement {
                curve: Curve::Line(segment),
                diameter: 0.0,
                conduit_type: Some(conduit_type),
                level: Some(level),
                connected: Vec::new(),
            }),
        );
        Ok(id)
    }

    fn set_diameter(&mut self, id: ElementId, diameter: f64) -> Result<(), CommandError> {
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(CommandError::Host(format!(
                "diameter must be positive, got {diameter}",
            )));
        }
        self.conduit_mut(id)?.diameter = diameter;
        Ok(())
    }

    fn set_curve(&mut self, id: ElementId, segment: Segment) -> Result<(), CommandError> {
        self.conduit_mut(id)?.curve = Curve::Line(segment);
        Ok(())
    }
}

impl ConnectorGraph for MemoryDocument {
    fn connectors(&self, id: ElementId) -> Result<Vec<Connector>, CommandError> {
        match self.scene.elements.get(&id) {
            Some(Element::Conduit(conduit)) => Ok(curve_ends(&conduit.curve)
                .into_iter()
                .enumerate()
                .map(|(index, origin)| Connector {
                    owner: id,
                    index,
                    origin,
                    connected: conduit.connected.contains(&index),
                })
                .collect()),
            Some(Element::Fitting(fitting)) => Ok(fitting
                .ports
                .iter()
                .enumerate()
                .map(|(index, origin)| Connector {
                    owner: id,
                    index,
                    origin: *origin,
                    connected: index < fitting.joins.len(),
                })
                .collect()),
            Some(Element::Other { .. }) => Err(CommandError::NotConnectable(id)),
            None => Err(CommandError::InputShape(format!(
                "element {id} does not exist",
            ))),
        }
    }

    fn create_elbow(&mut self, a: &Connector, b: &Connector) -> Result<ElementId, CommandError> {
        if a.owner == b.owner {
            return Err(CommandError::Host(format!(
                "cannot join element {} to itself",
                a.owner,
            )));
        }
        let gap = a.origin.distance(b.origin);
        if gap > self.tolerance {
            return Err(CommandError::Host(format!(
                "connector {} of element {} and connector {} of element {} are {gap} apart",
                a.index, a.owner, b.index, b.owner,
            )));
        }
        self.attach(a)?;
        self.attach(b)?;

        let id = self.next_id();
        self.scene.elements.insert(
            id,
            Element::Fitting(FittingElement {
                ports: vec![a.origin, b.origin],
                joins: vec![(a.owner, a.index), (b.owner, b.index)],
            }),
        );
        Ok(id)
    }
}

impl TransactionScope for MemoryDocument {
    fn transaction<T, F>(&mut self, name: &str, f: F) -> Result<T, CommandError>
    where
        F: FnOnce(&mut Self) -> Result<T, CommandError>,
    {
        let snapshot = self.scene.clone();
        let result = f(self);
        let outcome = if result.is_ok() {
            TransactionOutcome::Committed
        } else {
            self.scene = snapshot;
            TransactionOutcome::RolledBack
        };
        tracing::debug!(transaction = name, ?outcome, "transaction finished");
        self.journal.push(TransactionRecord {
            name: name.to_owned(),
            outcome,
        });
        result
    }
}
