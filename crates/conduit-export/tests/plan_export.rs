//! Export of complete plans produced by the geometry core.

#![allow(clippy::unwrap_used)]

use conduit_export::{SvgMetadata, to_svg};
use conduit_geometry::{GeometryConfig, Point3, RebindMode, Segment, plan_connection};

fn segment(a: (f64, f64, f64), b: (f64, f64, f64)) -> Segment {
    Segment::new(Point3::new(a.0, a.1, a.2), Point3::new(b.0, b.1, b.2), 1e-9).unwrap()
}

#[test]
fn report_and_config_embed_in_exported_plan() {
    let config = GeometryConfig {
        rebind_mode: RebindMode::Trim,
        ..GeometryConfig::default()
    };
    let plan = plan_connection(
        &segment((0.0, 0.0, 3.0), (10.0, 0.0, 3.0)),
        &segment((20.0, 5.0, 3.0), (30.0, 5.0, 3.0)),
        &config,
    )
    .unwrap();
    let report = plan.report();
    let config_json = serde_json::to_string(&config).unwrap();

    let svg = to_svg(
        &plan,
        &SvgMetadata {
            title: Some("scenario"),
            description: Some(&report),
            config_json: Some(&config_json),
        },
    );

    assert!(svg.contains("<title>scenario</title>"));
    assert!(svg.contains("Connection Plan"));
    assert!(svg.contains("Trim"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn every_quadrant_exports() {
    let ab = segment((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
    for cd in [
        segment((20.0, 5.0, 0.0), (30.0, 5.0, 0.0)),
        segment((20.0, -5.0, 0.0), (30.0, -5.0, 0.0)),
        segment((-20.0, 5.0, 0.0), (-30.0, 5.0, 0.0)),
        segment((-20.0, -5.0, 0.0), (-30.0, -5.0, 0.0)),
    ] {
        let plan = plan_connection(&ab, &cd, &GeometryConfig::default()).unwrap();
        let svg = to_svg(&plan, &SvgMetadata::default());
        assert_eq!(svg.matches("<path").count(), 5);
    }
}
