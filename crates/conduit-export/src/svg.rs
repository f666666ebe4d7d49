//! SVG plan-view serializer.
//!
//! Draws a [`ConnectionPlan`] seen from above using the [`svg`] crate for
//! document construction, XML escaping and path data formatting. Model
//! y grows upward while SVG y grows downward, so every coordinate is
//! flipped through a [`PlanFrame`].
//!
//! The document has three groups:
//!
//! - `original`: both input segments, dashed.
//! - `result`: the first segment, the connecting segment and the
//!   reshaped second segment.
//! - `elbows`: one circle per elbow location.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

use conduit_geometry::{ConnectionPlan, Point3, Segment};

/// Fraction of the larger plan extent added as blank margin on each side.
const MARGIN_RATIO: f64 = 0.1;

/// Elbow marker radius as a fraction of the larger plan extent.
const ELBOW_RADIUS_RATIO: f64 = 0.015;

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped by the `svg`
/// crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the plan report.
    pub description: Option<&'a str>,

    /// Geometry configuration JSON, emitted inside `<metadata>` so an
    /// exported drawing records the settings it was produced with.
    pub config_json: Option<&'a str>,
}

/// Mapping from model plan coordinates into the SVG `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanFrame {
    min_x: f64,
    max_y: f64,
    margin: f64,
    width: f64,
    height: f64,
}

impl PlanFrame {
    /// Smallest frame containing every point, padded by a margin.
    ///
    /// A zero extent (all points coincide) is padded to a unit square so
    /// the `viewBox` stays valid.
    #[must_use]
    pub fn around(points: &[Point3]) -> Self {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        if points.is_empty() {
            (min_x, max_x, min_y, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        let extent = (max_x - min_x).max(max_y - min_y);
        let margin = if extent > 0.0 {
            extent * MARGIN_RATIO
        } else {
            0.5
        };
        Self {
            min_x,
            max_y,
            margin,
            width: 2.0f64.mul_add(margin, max_x - min_x),
            height: 2.0f64.mul_add(margin, max_y - min_y),
        }
    }

    /// Map a model point to SVG coordinates, dropping z.
    #[must_use]
    pub fn map(&self, p: Point3) -> (f64, f64) {
        (p.x - self.min_x + self.margin, self.max_y - p.y + self.margin)
    }

    /// `viewBox` width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// `viewBox` height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    fn elbow_radius(&self) -> f64 {
        self.width.max(self.height) * ELBOW_RADIUS_RATIO
    }
}

/// Build an SVG path `d` attribute string for a segment.
///
/// # Examples
///
/// ```
/// use conduit_geometry::{Point3, Segment};
/// use conduit_export::{PlanFrame, build_path_data};
///
/// let s = Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 0.0), 1e-9).unwrap();
/// let frame = PlanFrame::around(&[s.start(), s.end()]);
/// assert_eq!(build_path_data(&s, &frame), "M1,11 L11,1");
/// ```
#[must_use]
pub fn build_path_data(segment: &Segment, frame: &PlanFrame) -> String {
    let data = Data::new()
        .move_to(frame.map(segment.start()))
        .line_to(frame.map(segment.end()));
    String::from(Value::from(data))
}

fn line_path(from: Point3, to: Point3, frame: &PlanFrame, stroke: &str) -> Path {
    let data = Data::new().move_to(frame.map(from)).line_to(frame.map(to));
    Path::new()
        .set("d", data)
        .set("fill", "none")
        .set("stroke", stroke)
        .set("stroke-width", 1)
        .set("vector-effect", "non-scaling-stroke")
}

fn segment_path(segment: &Segment, frame: &PlanFrame, stroke: &str) -> Path {
    line_path(segment.start(), segment.end(), frame, stroke)
}

/// Serialize a connection plan into an SVG document string.
///
/// Returns a complete SVG document with an XML declaration.
#[must_use]
pub fn to_svg(plan: &ConnectionPlan, metadata: &SvgMetadata<'_>) -> String {
    let connector_start = plan.connector.start_line;
    let connector_end = plan.connector.end_line;
    let frame = PlanFrame::around(&[
        plan.first.start(),
        plan.first.end(),
        plan.second.start(),
        plan.second.end(),
        connector_start,
        connector_end,
        plan.rebind.segment.start(),
        plan.rebind.segment.end(),
    ]);

    let mut doc = Document::new()
        .set("width", frame.width())
        .set("height", frame.height())
        .set("viewBox", format!("0 0 {} {}", frame.width(), frame.height()));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }
    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("conduit:config");
        config_el.assign("xmlns:conduit", "urn:conduit-join:config");
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    let original = Group::new()
        .set("id", "original")
        .set("stroke-dasharray", "4 2")
        .add(segment_path(&plan.first, &frame, "gray"))
        .add(segment_path(&plan.second, &frame, "gray"));

    let result = Group::new()
        .set("id", "result")
        .add(segment_path(&plan.first, &frame, "black"))
        .add(line_path(connector_start, connector_end, &frame, "red"))
        .add(segment_path(&plan.rebind.segment, &frame, "black"));

    let radius = frame.elbow_radius();
    let mut elbows = Group::new().set("id", "elbows");
    for location in [plan.attachments.first, plan.attachments.second] {
        let (cx, cy) = frame.map(location);
        elbows = elbows.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", radius)
                .set("fill", "blue"),
        );
    }

    doc = doc.add(original).add(result).add(elbows);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use conduit_geometry::{GeometryConfig, plan_connection};

    use super::*;

    fn segment(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(Point3::new(a.0, a.1, 0.0), Point3::new(b.0, b.1, 0.0), 1e-9).unwrap()
    }

    fn plan() -> ConnectionPlan {
        plan_connection(
            &segment((0.0, 0.0), (10.0, 0.0)),
            &segment((20.0, 5.0), (30.0, 5.0)),
            &GeometryConfig::default(),
        )
        .unwrap()
    }

    fn no_meta() -> SvgMetadata<'static> {
        SvgMetadata::default()
    }

    #[test]
    fn frame_flips_y() {
        let frame = PlanFrame::around(&[Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 0.0)]);
        assert_eq!(frame.map(Point3::new(0.0, 10.0, 0.0)), (1.0, 1.0));
        assert_eq!(frame.map(Point3::new(10.0, 0.0, 0.0)), (11.0, 11.0));
    }

    #[test]
    fn frame_pads_by_larger_extent() {
        let frame = PlanFrame::around(&[Point3::new(0.0, 0.0, 0.0), Point3::new(20.0, 5.0, 0.0)]);
        assert!((frame.width() - 24.0).abs() < 1e-12);
        assert!((frame.height() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn frame_of_single_point_is_not_empty() {
        let frame = PlanFrame::around(&[Point3::new(3.0, 3.0, 3.0)]);
        assert!(frame.width() > 0.0);
        assert!(frame.height() > 0.0);
    }

    #[test]
    fn frame_ignores_z() {
        let frame = PlanFrame::around(&[Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 0.0)]);
        assert_eq!(
            frame.map(Point3::new(5.0, 5.0, 100.0)),
            frame.map(Point3::new(5.0, 5.0, -3.0))
        );
    }

    #[test]
    fn document_has_declaration_and_groups() {
        let svg = to_svg(&plan(), &no_meta());
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"id="original""#));
        assert!(svg.contains(r#"id="result""#));
        assert!(svg.contains(r#"id="elbows""#));
    }

    #[test]
    fn draws_five_paths_and_two_elbows() {
        let svg = to_svg(&plan(), &no_meta());
        assert_eq!(svg.matches("<path").count(), 5);
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn connector_is_red() {
        let svg = to_svg(&plan(), &no_meta());
        assert_eq!(svg.matches(r#"stroke="red""#).count(), 1);
    }

    #[test]
    fn no_metadata_elements_by_default() {
        let svg = to_svg(&plan(), &no_meta());
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("<desc>"));
        assert!(!svg.contains("<metadata>"));
    }

    #[test]
    fn metadata_is_escaped() {
        let meta = SvgMetadata {
            title: Some("A & B"),
            description: Some("x < y"),
            config_json: Some(r#"{"tolerance":1e-9}"#),
        };
        let svg = to_svg(&plan(), &meta);
        assert!(svg.contains("<title>A &amp; B</title>"));
        assert!(svg.contains("x &lt; y"));
        assert!(svg.contains("<metadata>"));
        assert!(svg.contains(r#"xmlns:conduit="urn:conduit-join:config""#));
    }
}
