#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod source;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ClampBounds, Config, FailurePolicy, LayoutConfig, NoFreeCellPolicy, load_config};
pub use ir::{Division, LayoutDocument, Point, PositionMap, Rect};
pub use layout::{
    Floorplan, LayoutEngine, LayoutError, PlacementStrategy, Resolution, SafePlacement,
    find_optimal_position, find_safe_position, overlaps, resolve_overlaps,
};
pub use parser::{parse_division_entry, parse_layout};
