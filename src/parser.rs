use crate::ir::{Division, LayoutDocument, Point, PositionMap, Rect};
use crate::layout::LayoutError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

const NUMBER: &str = r"[-+]?(?:\d+(?:\.\d*)?|\.\d+)";

static SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*({NUMBER})\s*[xX]\s*({NUMBER})\s*$")).unwrap()
});
static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*({NUMBER})\s*,\s*({NUMBER})\s*$")).unwrap()
});
static DIVISION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*([A-Za-z0-9_.-]+)\s*@\s*({NUMBER})\s*,\s*({NUMBER})\s*:\s*({NUMBER})\s*[xX]\s*({NUMBER})\s*$"
    ))
    .unwrap()
});

/// Division entry as written in layout files: the rectangle is flattened.
#[derive(Debug, Deserialize)]
struct DivisionEntry {
    id: String,
    name: Option<String>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl From<DivisionEntry> for Division {
    fn from(entry: DivisionEntry) -> Self {
        let division = Division::new(
            entry.id,
            Rect::new(entry.x, entry.y, entry.width, entry.height),
        );
        match entry.name {
            Some(name) => division.with_name(name),
            None => division,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentFile {
    divisions: Vec<DivisionEntry>,
    #[serde(default)]
    positions: PositionMap,
}

/// Parses a JSON5 (or plain JSON) layout document and validates it.
pub fn parse_layout(input: &str) -> Result<LayoutDocument, LayoutError> {
    let parsed: DocumentFile =
        json5::from_str(input).map_err(|err| LayoutError::Parse(err.to_string()))?;
    let divisions = parsed.divisions.into_iter().map(Division::from).collect();
    let document = LayoutDocument {
        divisions,
        positions: parsed.positions,
    };
    document.validate()?;
    Ok(document)
}

/// A single flat division entry, `{id, name?, x, y, width, height}`, as it
/// appears in a layout document.
pub fn parse_division_entry(input: &str) -> Result<Division, LayoutError> {
    let entry: DivisionEntry =
        json5::from_str(input).map_err(|err| LayoutError::Parse(err.to_string()))?;
    let division = Division::from(entry);
    division.validate()?;
    Ok(division)
}

/// `WIDTHxHEIGHT`, e.g. `25x20`.
pub fn parse_size(input: &str) -> Result<(f32, f32), LayoutError> {
    let caps = SIZE_RE
        .captures(input)
        .ok_or_else(|| LayoutError::Parse(format!("expected WIDTHxHEIGHT, got '{input}'")))?;
    Ok((number(&caps[1])?, number(&caps[2])?))
}

/// `X,Y`, e.g. `55,40`.
pub fn parse_point(input: &str) -> Result<Point, LayoutError> {
    let caps = POINT_RE
        .captures(input)
        .ok_or_else(|| LayoutError::Parse(format!("expected X,Y, got '{input}'")))?;
    Ok(Point::new(number(&caps[1])?, number(&caps[2])?))
}

/// Compact division syntax `ID@X,Y:WIDTHxHEIGHT`, e.g. `research@20,20:25x25`.
pub fn parse_division_spec(input: &str) -> Result<Division, LayoutError> {
    let caps = DIVISION_RE.captures(input).ok_or_else(|| {
        LayoutError::Parse(format!("expected ID@X,Y:WIDTHxHEIGHT, got '{input}'"))
    })?;
    let division = Division::new(
        &caps[1],
        Rect::new(
            number(&caps[2])?,
            number(&caps[3])?,
            number(&caps[4])?,
            number(&caps[5])?,
        ),
    );
    division.validate()?;
    Ok(division)
}

fn number(raw: &str) -> Result<f32, LayoutError> {
    raw.parse::<f32>()
        .map_err(|err| LayoutError::Parse(format!("invalid number '{raw}': {err}")))
}
