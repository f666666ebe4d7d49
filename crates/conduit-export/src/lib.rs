//! conduit-export: Pure plan-view serializers (sans-IO)
//!
//! Renders a [`ConnectionPlan`](conduit_geometry::ConnectionPlan) as a
//! top-down drawing. Currently supports SVG.

pub mod svg;

pub use svg::{PlanFrame, SvgMetadata, build_path_data, to_svg};
