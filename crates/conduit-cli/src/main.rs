//! conduit-connect: run the conduit connect command against a JSON scene.
//!
//! Loads a scene, finds two conduits (from the selection or by id), joins
//! them with a connecting conduit and two elbows, and prints the
//! connection plan. Useful for:
//!
//! - Checking which quadrant branch and rebind row a layout hits
//! - Comparing re-bound and trim results for the same scene
//! - Producing a plan-view SVG of the result
//!
//! # Usage
//!
//! ```text
//! cargo run --bin conduit-connect -- [OPTIONS] <SCENE>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use conduit_geometry::{ConnectionPlan, GeometryConfig};
use conduit_host::{
    CommandConfig, CommandError, CommandVariant, ConnectOutcome, ElementId, MemoryDocument, Scene,
    preview, run,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Join two conduits in a JSON scene with a 45 degree connector.
///
/// Runs the connect command against the scene and prints the connection
/// plan, optionally writing the modified scene and a plan-view SVG.
#[derive(Debug, Parser)]
#[command(name = "conduit-connect", version)]
struct Cli {
    /// Path to the scene JSON file.
    scene: PathBuf,

    /// Which entry point of the command to run.
    #[arg(long, value_enum, default_value_t = Variant::SelectionRebound)]
    variant: Variant,

    /// Id of the conduit the connector starts from (fixed-trim only).
    #[arg(long, requires = "second")]
    first: Option<u64>,

    /// Id of the conduit to reshape (fixed-trim only).
    #[arg(long, requires = "first")]
    second: Option<u64>,

    /// Coordinate comparison tolerance in model units.
    #[arg(long, default_value_t = GeometryConfig::DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Full command config as a JSON string.
    ///
    /// When provided, `--variant`, `--first`, `--second` and
    /// `--tolerance` are ignored. The JSON must be a valid
    /// `CommandConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Compute and print the plan without changing the scene.
    #[arg(long)]
    plan_only: bool,

    /// Print the result (or error) as JSON instead of a report.
    #[arg(long)]
    json: bool,

    /// Write a plan-view SVG to this file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the resulting scene JSON to this file.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Command entry point selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    /// Selected conduits, second conduit re-bounded.
    SelectionRebound,
    /// Selected conduits, second conduit trimmed exactly.
    SelectionTrim,
    /// Conduits given by `--first`/`--second`, trimmed exactly.
    FixedTrim,
}

/// What gets printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Report<'a> {
    Planned {
        first: ElementId,
        second: ElementId,
        plan: &'a ConnectionPlan,
    },
    Connected(&'a ConnectOutcome),
    Error(&'a CommandError),
}

/// Build a [`CommandConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<CommandConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    let variant = match cli.variant {
        Variant::SelectionRebound => CommandVariant::SelectionRebound,
        Variant::SelectionTrim => CommandVariant::SelectionTrim,
        Variant::FixedTrim => CommandVariant::FixedTrim,
    };
    let fixed = cli
        .first
        .zip(cli.second)
        .map(|(first, second)| (ElementId(first), ElementId(second)));
    CommandConfig::for_variant(variant, fixed, cli.tolerance).map_err(|e| e.to_string())
}

fn load_scene(path: &Path) -> Result<Scene, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn print_json(report: &Report<'_>) -> bool {
    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            eprintln!("Error serializing result: {e}");
            false
        }
    }
}

fn write_svg(path: &Path, cli: &Cli, config: &CommandConfig, plan: &ConnectionPlan) -> bool {
    let title = cli
        .scene
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("conduit-connect");
    let report = plan.report();
    let config_json = serde_json::to_string(config).ok();
    let metadata = conduit_export::SvgMetadata {
        title: Some(title),
        description: Some(&report),
        config_json: config_json.as_deref(),
    };
    let svg = conduit_export::to_svg(plan, &metadata);
    match std::fs::write(path, &svg) {
        Ok(()) => {
            tracing::info!(path = %path.display(), bytes = svg.len(), "SVG written");
            true
        }
        Err(e) => {
            eprintln!("Error writing SVG to {}: {e}", path.display());
            false
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let scene = match load_scene(&cli.scene) {
        Ok(scene) => scene,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        scene = %cli.scene.display(),
        elements = scene.elements.len(),
        "scene loaded",
    );

    let mut doc = MemoryDocument::new(scene).with_tolerance(config.geometry.tolerance);

    let plan = if cli.plan_only {
        match preview(&doc, &config) {
            Ok((first, second, plan)) => {
                if cli.json {
                    if !print_json(&Report::Planned {
                        first,
                        second,
                        plan: &plan,
                    }) {
                        return ExitCode::FAILURE;
                    }
                } else {
                    println!("Conduits: {first} -> {second}");
                    println!("{}", plan.report());
                }
                plan
            }
            Err(e) => return fail(&e, cli.json),
        }
    } else {
        match run(&mut doc, &config) {
            Ok(outcome) => {
                if cli.json {
                    if !print_json(&Report::Connected(&outcome)) {
                        return ExitCode::FAILURE;
                    }
                } else {
                    println!("Conduits: {} -> {}", outcome.first, outcome.second);
                    println!("{}", outcome.plan.report());
                    println!("Connecting conduit: {}", outcome.connecting);
                    println!("Elbows: {}, {}", outcome.elbows[0], outcome.elbows[1]);
                }
                outcome.plan
            }
            Err(e) => return fail(&e, cli.json),
        }
    };

    if let Some(ref svg_path) = cli.svg
        && !write_svg(svg_path, &cli, &config, &plan)
    {
        return ExitCode::FAILURE;
    }

    if let Some(ref output) = cli.output {
        let written = serde_json::to_string_pretty(doc.scene())
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(output, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => tracing::info!(path = %output.display(), "scene written"),
            Err(e) => {
                eprintln!("Error writing scene to {}: {e}", output.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn fail(error: &CommandError, json: bool) -> ExitCode {
    tracing::error!(%error, "connect command failed");
    if json {
        print_json(&Report::Error(error));
    } else {
        eprintln!("Error: {error}");
    }
    ExitCode::FAILURE
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use conduit_geometry::RebindMode;
    use conduit_host::lookup::ElementLookup;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("conduit-connect").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_to_selection_rebound() {
        let config = config_from_cli(&parse(&["scene.json"])).unwrap();
        assert_eq!(config.lookup, ElementLookup::Selection);
        assert_eq!(config.geometry, GeometryConfig::default());
    }

    #[test]
    fn fixed_trim_takes_ids() {
        let cli = parse(&[
            "scene.json",
            "--variant",
            "fixed-trim",
            "--first",
            "3",
            "--second",
            "8",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(
            config.lookup,
            ElementLookup::Fixed {
                first: ElementId(3),
                second: ElementId(8),
            }
        );
        assert_eq!(config.geometry.rebind_mode, RebindMode::Trim);
    }

    #[test]
    fn fixed_trim_without_ids_fails() {
        let cli = parse(&["scene.json", "--variant", "fixed-trim"]);
        assert!(config_from_cli(&cli).is_err());
    }

    #[test]
    fn first_without_second_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["conduit-connect", "scene.json", "--first", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = parse(&[
            "scene.json",
            "--variant",
            "selection-trim",
            "--config-json",
            r#"{"geometry":{"tolerance":0.001}}"#,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!((config.geometry.tolerance - 0.001).abs() < f64::EPSILON);
        assert_eq!(config.geometry.rebind_mode, RebindMode::Rebound);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["scene.json", "--config-json", "{"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.starts_with("Error parsing --config-json"));
    }

    #[test]
    fn bundled_scene_connects() {
        let scene: Scene = serde_json::from_str(include_str!("../scenes/offset-runs.json")).unwrap();
        let mut doc = MemoryDocument::new(scene);
        let config = config_from_cli(&parse(&["offset-runs.json"])).unwrap();
        let outcome = run(&mut doc, &config).unwrap();
        assert_eq!(outcome.connecting, ElementId(4));
        assert_eq!(doc.scene().elements.len(), 6);
    }

    #[test]
    fn unwritable_svg_path_is_a_failure() {
        let scene: Scene = serde_json::from_str(include_str!("../scenes/offset-runs.json")).unwrap();
        let cli = parse(&["offset-runs.json"]);
        let config = config_from_cli(&cli).unwrap();
        let (_, _, plan) = preview(&MemoryDocument::new(scene), &config).unwrap();
        let missing_dir = std::env::temp_dir()
            .join("conduit-connect-no-such-dir")
            .join("plan.svg");
        assert!(!write_svg(&missing_dir, &cli, &config, &plan));
    }
}
