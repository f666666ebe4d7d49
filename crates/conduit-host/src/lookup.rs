//! Locating the two conduits to join.

use conduit_geometry::Segment;
use serde::{Deserialize, Serialize};

use crate::document::ElementSource;
use crate::types::{CommandError, Curve, ElementId};

/// How the command finds its two conduits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ElementLookup {
    /// The first two elements of the user's selection.
    #[default]
    Selection,

    /// Two known element ids.
    Fixed {
        /// The conduit the connector starts from.
        first: ElementId,
        /// The conduit that is reshaped to meet the connector.
        second: ElementId,
    },
}

impl ElementLookup {
    /// Resolve the two element ids.
    ///
    /// With [`Selection`](Self::Selection), elements beyond the second
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InputShape`] if fewer than two distinct
    /// elements are available.
    pub fn resolve<S: ElementSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<(ElementId, ElementId), CommandError> {
        let (first, second) = match *self {
            Self::Selection => {
                let selection = source.selection();
                match selection.as_slice() {
                    [first, second, rest @ ..] => {
                        if !rest.is_empty() {
                            tracing::warn!(
                                ignored = rest.len(),
                                "more than two elements selected, using the first two",
                            );
                        }
                        (*first, *second)
                    }
                    _ => {
                        return Err(CommandError::InputShape(format!(
                            "select two conduits (got {})",
                            selection.len(),
                        )));
                    }
                }
            }
            Self::Fixed { first, second } => (first, second),
        };

        if first == second {
            return Err(CommandError::InputShape(format!(
                "both conduits are the same element {first}",
            )));
        }
        Ok((first, second))
    }
}

/// Read an element's straight backing line.
///
/// The segment is re-validated against `tolerance` so a line shorter than
/// the comparison tolerance is rejected here rather than inside the
/// geometry core.
///
/// # Errors
///
/// Returns [`CommandError::InputShape`] if the element is missing, is not
/// straight, or is shorter than `tolerance`.
pub fn backing_line<S: ElementSource + ?Sized>(
    source: &S,
    id: ElementId,
    tolerance: f64,
) -> Result<Segment, CommandError> {
    match source.curve(id)? {
        Curve::Line(segment) => Segment::new(segment.start(), segment.end(), tolerance)
            .map_err(|e| CommandError::InputShape(format!("element {id}: {e}"))),
        Curve::Arc { .. } => Err(CommandError::InputShape(format!(
            "element {id} has no straight backing line",
        ))),
    }
}
