//! Traces a PNG and writes a cookie cutter STL.
//!
//! Usage:
//! ```text
//! cargo run --example trace_to_stl -- logo.png cutter.stl
//! cargo run --example trace_to_stl -- logo.png cutter.stl settings.json
//! ```
//!
//! `settings.json` holds `CutterSettings` in camelCase; missing fields take
//! their defaults.

use std::collections::HashSet;
use std::error::Error;

use cutterkit::operations::simplify::refine_traced;
use cutterkit::{write_stl, ContourSet, CutterSettings, GenerateGeometry, TraceImage, TraceOptions};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    // Default: WARN for everything, INFO for cutterkit.
    // Override with RUST_LOG env var (e.g. RUST_LOG=cutterkit=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("trace_to_stl=info".parse().unwrap_or_default())
        .add_directive("cutterkit=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        return Err("usage: trace_to_stl <image.png> <out.stl> [settings.json]".into());
    };
    let settings = match args.next() {
        Some(path) => CutterSettings::from_json(&std::fs::read_to_string(path)?)?,
        None => CutterSettings::default(),
    };

    let image = image::open(&input)?.to_rgba8();
    let traced = TraceImage::new(&image, TraceOptions::default()).execute()?;
    if traced.is_empty() {
        warn!(input = %input, "no shapes detected; try another threshold");
        return Ok(());
    }

    let contours = ContourSet::with_defaults(refine_traced(&traced.contours));
    let parts = GenerateGeometry::new(&contours, traced.width, traced.height, &settings).execute();
    write_stl(&output, &parts, &HashSet::new())?;
    info!(output = %output, parts = parts.len(), "stl written");
    Ok(())
}
