use floorplan_layout::layout_dump::LayoutDump;
use floorplan_layout::{
    ClampBounds, Floorplan, LayoutConfig, LayoutEngine, PlacementStrategy, Resolution,
    parse_division_entry, parse_layout,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FloorplanOptions {
    buffer: Option<f32>,
    max_iterations: Option<usize>,
    bounds: Option<String>,
    strategy: Option<PlacementStrategy>,
}

fn parse_options(options_json: Option<String>) -> Result<FloorplanOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(FloorplanOptions::default()),
    }
}

fn build_layout_config(options: &FloorplanOptions) -> Result<LayoutConfig, String> {
    let mut config = LayoutConfig::default();
    if let Some(buffer) = options.buffer {
        config.buffer = buffer;
    }
    if let Some(max_iterations) = options.max_iterations {
        config.resolve.max_iterations = max_iterations;
    }
    match options.bounds.as_deref() {
        None | Some("canvas") => {}
        Some("dashboard") => config.resolve.bounds = ClampBounds::dashboard(),
        Some(other) => return Err(format!("unknown bounds preset '{other}'")),
    }
    config.validate().map_err(|error| error.to_string())?;
    Ok(config)
}

fn dump_json(plan: &Floorplan, resolution: Option<&Resolution>) -> Result<String, String> {
    let dump = LayoutDump::from_floorplan(plan, resolution, true);
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

fn resolve_layout_inner(document: &str, options_json: Option<String>) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let config = build_layout_config(&options)?;
    let document = parse_layout(document).map_err(|error| error.to_string())?;
    let mut plan = Floorplan::new(document, config).map_err(|error| error.to_string())?;
    let resolution = plan.resolve().map_err(|error| error.to_string())?;
    dump_json(&plan, Some(&resolution))
}

fn place_division_inner(
    document: &str,
    division_json: &str,
    options_json: Option<String>,
) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let config = build_layout_config(&options)?;
    let document = parse_layout(document).map_err(|error| error.to_string())?;
    let division = parse_division_entry(division_json).map_err(|error| error.to_string())?;
    let mut plan = Floorplan::new(document, config).map_err(|error| error.to_string())?;
    plan.add_division(division, options.strategy.unwrap_or_default())
        .map_err(|error| error.to_string())?;
    dump_json(&plan, None)
}

fn optimal_position_inner(document: &str, options_json: Option<String>) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let config = build_layout_config(&options)?;
    let document = parse_layout(document).map_err(|error| error.to_string())?;
    let engine = LayoutEngine::new(config).map_err(|error| error.to_string())?;
    let point = floorplan_layout::find_optimal_position(
        &document.divisions,
        &document.positions,
        engine.config(),
    );
    serde_json::to_string(&point).map_err(|error| error.to_string())
}

/// Resolves overlaps in a layout document and returns the layout dump as JSON.
#[wasm_bindgen]
pub fn resolve_layout(document: &str, options_json: Option<String>) -> Result<String, JsValue> {
    resolve_layout_inner(document, options_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn place_division(
    document: &str,
    division_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    place_division_inner(document, division_json, options_json)
        .map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn find_optimal_position(
    document: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    optimal_position_inner(document, options_json).map_err(|error| JsValue::from_str(&error))
}
