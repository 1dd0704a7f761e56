use std::path::Path;

use floorplan_layout::layout::{
    find_safe_position_with_report, overlapping_pairs, resolve_with_report, scan_free_cell,
};
use floorplan_layout::source::{DivisionSource, default_office};
use floorplan_layout::{
    Division, Floorplan, LayoutConfig, LayoutDocument, Point, PositionMap, Rect,
    find_optimal_position, overlaps, parse_layout,
};

fn load_fixture(rel: &str) -> LayoutDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_layout(&input).expect("fixture parse failed")
}

fn assert_contained(doc: &LayoutDocument, positions: &PositionMap, fixture: &str) {
    for division in &doc.divisions {
        let rect = floorplan_layout::layout::effective_rect(division, positions);
        assert!(rect.x >= 0.0, "{fixture}: {} x={} below 0", division.id, rect.x);
        assert!(rect.y >= 0.0, "{fixture}: {} y={} below 0", division.id, rect.y);
        assert!(
            rect.x <= 100.0 - rect.width,
            "{fixture}: {} x={} past right edge",
            division.id,
            rect.x
        );
        assert!(
            rect.y <= 100.0 - rect.height,
            "{fixture}: {} y={} past bottom edge",
            division.id,
            rect.y
        );
    }
}

#[test]
fn resolve_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = [
        "coincident.json5",
        "corners.json5",
        "three_tiles.json5",
        "triangle.json5",
        "office.json5",
    ];
    let config = LayoutConfig::default();
    for rel in fixtures {
        let doc = load_fixture(rel);
        let report = resolve_with_report(&doc.divisions, &doc.positions, &config);
        assert_contained(&doc, &report.positions, rel);
        assert!(report.iterations <= config.resolve.max_iterations, "{rel}: ran past the cap");
        assert!(
            report.converged || report.iterations == config.resolve.max_iterations,
            "{rel}: stopped early with overlaps left"
        );
        assert_eq!(
            report.converged,
            overlapping_pairs(&doc.divisions, &report.positions, config.buffer).is_empty(),
            "{rel}: convergence flag disagrees with the predicate"
        );
    }
}

#[test]
fn coincident_divisions_are_separated() {
    let doc = load_fixture("coincident.json5");
    let config = LayoutConfig::default();
    let report = resolve_with_report(&doc.divisions, &doc.positions, &config);
    assert!(report.converged);
    assert!(!overlaps(
        &doc.divisions[0],
        &doc.divisions[1],
        &report.positions,
        config.buffer
    ));
    assert_contained(&doc, &report.positions, "coincident.json5");
}

#[test]
fn tight_triangle_terminates_within_the_cap() {
    let doc = load_fixture("triangle.json5");
    let config = LayoutConfig::default();
    let report = resolve_with_report(&doc.divisions, &doc.positions, &config);
    assert!(report.iterations >= 1);
    assert!(report.iterations <= 100);
    if !report.converged {
        assert_eq!(report.iterations, 100);
        assert!(report.remaining_overlaps > 0);
    }
}

#[test]
fn safe_position_finds_the_open_quadrant() {
    let doc = load_fixture("three_tiles.json5");
    let config = LayoutConfig::default();
    let new = Division::new("ops", Rect::new(55.0, 40.0, 25.0, 25.0));
    let placement = find_safe_position_with_report(&new, &doc.divisions, &doc.positions, &config);

    assert!(placement.conflict_free);
    assert!(placement.attempts <= config.safe_position.max_attempts);
    let placed = Division::new("ops", Rect::new(
        placement.position.x,
        placement.position.y,
        25.0,
        25.0,
    ));
    for existing in &doc.divisions {
        assert!(
            !overlaps(&placed, existing, &doc.positions, config.buffer),
            "placed division conflicts with {}",
            existing.id
        );
    }
}

#[test]
fn safe_position_on_a_saturated_floor_is_best_effort() {
    // Four 25x25 tiles around the center leave no 25x25 slot anywhere on the
    // canvas, so the search must exhaust its attempts and still stay in bounds.
    let doc = load_fixture("corners.json5");
    let config = LayoutConfig::default();
    let new = Division::new("ops", Rect::new(55.0, 40.0, 25.0, 25.0));
    let placement = find_safe_position_with_report(&new, &doc.divisions, &doc.positions, &config);

    assert!(!placement.conflict_free);
    assert_eq!(placement.attempts, config.safe_position.max_attempts);
    assert!((0.0..=75.0).contains(&placement.position.x));
    assert!((0.0..=75.0).contains(&placement.position.y));
}

#[test]
fn grid_scan_is_deterministic() {
    let doc = load_fixture("three_tiles.json5");
    let config = LayoutConfig::default();
    let first = find_optimal_position(&doc.divisions, &doc.positions, &config);
    let second = find_optimal_position(&doc.divisions, &doc.positions, &config);
    assert_eq!(first, second);
    // Only the bottom-right cell escapes the buffered tiles.
    assert_eq!(first, Point::new(65.0, 65.0));
}

#[test]
fn grid_scan_on_a_full_grid_returns_the_fallback() {
    let doc = load_fixture("corners.json5");
    let config = LayoutConfig::default();
    assert_eq!(scan_free_cell(&doc.divisions, &doc.positions, &config), None);
    assert_eq!(
        find_optimal_position(&doc.divisions, &doc.positions, &config),
        Point::new(50.0, 50.0)
    );
}

#[test]
fn default_office_resolves_cleanly() {
    let doc = default_office().load().unwrap();
    let mut plan = Floorplan::new(doc, LayoutConfig::default()).unwrap();
    assert_eq!(
        plan.overlapping_pairs(),
        vec![("support".to_string(), "operations".to_string())]
    );
    let resolution = plan.resolve().unwrap();
    assert!(resolution.converged);
    assert_eq!(resolution.iterations, 2);
    assert_eq!(
        plan.effective_rect("operations").unwrap(),
        Rect::new(70.0, 45.0, 30.0, 25.0)
    );
    assert!(!plan.is_overridden("research"));
}

#[test]
fn out_of_bounds_override_is_pulled_back() {
    let doc = load_fixture("office.json5");
    let mut plan = Floorplan::new(doc, LayoutConfig::default()).unwrap();
    plan.resolve().unwrap();
    let rect = plan.effective_rect("operations").unwrap();
    assert!(rect.x <= 70.0);
    assert!(rect.y >= 0.0);
}
