//! The connect command.
//!
//! Joins two conduits with a new connecting conduit and two elbows, in
//! two transactions grouped under one outer transaction:
//!
//! 1. `createConduit`: create the connecting conduit with the first
//!    conduit's diameter and reshape the second conduit.
//! 2. `createConduitConnect`: resolve the connectors for both elbows,
//!    then create the elbows.
//!
//! All validation happens before the first transaction opens. Any later
//! failure rolls the outer transaction back, leaving the document as it
//! was.

use conduit_geometry::{
    ConnectionPlan, GeometryConfig, RebindMode, Segment, plan_connection,
};
use serde::{Deserialize, Serialize};

use crate::document::{ElementSource, HostDocument, resolve_elbow};
use crate::lookup::{ElementLookup, backing_line};
use crate::types::{CommandError, ElementId};

/// The three entry points the command is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommandVariant {
    /// Selected conduits, second conduit re-bounded.
    #[default]
    SelectionRebound,
    /// Selected conduits, second conduit trimmed exactly.
    SelectionTrim,
    /// Conduits given by id, second conduit trimmed exactly.
    FixedTrim,
}

impl CommandVariant {
    /// Rebind mode this variant applies.
    #[must_use]
    pub const fn rebind_mode(self) -> RebindMode {
        match self {
            Self::SelectionRebound => RebindMode::Rebound,
            Self::SelectionTrim | Self::FixedTrim => RebindMode::Trim,
        }
    }
}

/// Full command configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// How the two conduits are found.
    pub lookup: ElementLookup,
    /// Geometry settings, including the rebind mode.
    pub geometry: GeometryConfig,
}

impl CommandConfig {
    /// Build the configuration for one of the command's entry points.
    ///
    /// `fixed` supplies the element ids for [`CommandVariant::FixedTrim`]
    /// and is ignored by the selection-based variants.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InputShape`] if `FixedTrim` is requested
    /// without ids.
    pub fn for_variant(
        variant: CommandVariant,
        fixed: Option<(ElementId, ElementId)>,
        tolerance: f64,
    ) -> Result<Self, CommandError> {
        let lookup = match variant {
            CommandVariant::SelectionRebound | CommandVariant::SelectionTrim => {
                ElementLookup::Selection
            }
            CommandVariant::FixedTrim => {
                let (first, second) = fixed.ok_or_else(|| {
                    CommandError::InputShape(
                        "fixed-id lookup needs a first and second element id".to_owned(),
                    )
                })?;
                ElementLookup::Fixed { first, second }
            }
        };
        Ok(Self {
            lookup,
            geometry: GeometryConfig {
                tolerance,
                rebind_mode: variant.rebind_mode(),
            },
        })
    }
}

/// What the command did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectOutcome {
    /// The conduit the connector starts from.
    pub first: ElementId,
    /// The conduit that was reshaped.
    pub second: ElementId,
    /// The new connecting conduit.
    pub connecting: ElementId,
    /// Elbow at the first conduit, then elbow at the second.
    pub elbows: [ElementId; 2],
    /// Geometry that was applied.
    pub plan: ConnectionPlan,
}

/// Look up the two conduits and compute the connection without
/// touching the document.
///
/// # Errors
///
/// Returns [`CommandError::InputShape`] for missing or non-straight
/// conduits and [`CommandError::Geometry`] when the geometry core
/// rejects them.
pub fn preview<S: ElementSource + ?Sized>(
    source: &S,
    config: &CommandConfig,
) -> Result<(ElementId, ElementId, ConnectionPlan), CommandError> {
    config.geometry.validate()?;
    let (first, second) = config.lookup.resolve(source)?;
    let tolerance = config.geometry.tolerance;
    let first_line = backing_line(source, first, tolerance)?;
    let second_line = backing_line(source, second, tolerance)?;

    tracing::debug!(%first, %second, mode = ?config.geometry.rebind_mode, "planning connection");
    let plan = plan_connection(&first_line, &second_line, &config.geometry)?;
    Ok((first, second, plan))
}

/// Run the connect command against `doc`.
///
/// # Errors
///
/// Returns [`CommandError::InputShape`], [`CommandError::Geometry`] or
/// [`CommandError::MissingDefault`] before any change is made, and
/// [`CommandError::NoConnectors`], [`CommandError::NotConnectable`] or
/// [`CommandError::Host`] from the mutation phases, in which case the
/// document is rolled back.
pub fn run<D: HostDocument>(
    doc: &mut D,
    config: &CommandConfig,
) -> Result<ConnectOutcome, CommandError> {
    let (first, second, plan) = preview(&*doc, config)?;
    let diameter = doc.diameter(first)?;
    let conduit_type = doc
        .conduit_type()
        .ok_or_else(|| CommandError::MissingDefault("conduit type".to_owned()))?;
    let level = doc
        .level()
        .ok_or_else(|| CommandError::MissingDefault("level".to_owned()))?;
    let connector_line = Segment::new(
        plan.connector.start_line,
        plan.connector.end_line,
        config.geometry.tolerance,
    )?;

    let (connecting, elbows) = doc.transaction("connectConduits", |doc| {
        let connecting = doc.transaction("createConduit", |doc| {
            let id = doc.create_conduit(conduit_type, connector_line, level)?;
            doc.set_diameter(id, diameter)?;
            doc.set_curve(second, plan.rebind.segment)?;
            Ok(id)
        })?;
        tracing::info!(%connecting, %second, "connecting conduit created");

        let elbows = doc.transaction("createConduitConnect", |doc| {
            let at_first = resolve_elbow(&*doc, plan.attachments.first, first, connecting)?;
            let at_second = resolve_elbow(&*doc, plan.attachments.second, second, connecting)?;
            let first_elbow = doc.create_elbow(&at_first.existing, &at_first.connecting)?;
            let second_elbow = doc.create_elbow(&at_second.existing, &at_second.connecting)?;
            Ok([first_elbow, second_elbow])
        })?;
        tracing::info!(elbows = ?elbows, "elbows created");

        Ok((connecting, elbows))
    })?;

    Ok(ConnectOutcome {
        first,
        second,
        connecting,
        elbows,
        plan,
    })
}
