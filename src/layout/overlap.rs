// Buffered overlap tests between divisions. Pure geometry: positions are read
// from the override map when present, otherwise from each division's default.

use crate::ir::{Division, PositionMap, Rect};

/// The division's rectangle at its current position.
pub fn effective_rect(division: &Division, positions: &PositionMap) -> Rect {
    match positions.get(&division.id) {
        Some(origin) => division.position.at(*origin),
        None => division.position,
    }
}

/// True when the two rectangles, each grown by `buffer`, intersect.
pub fn rects_overlap(a: &Rect, b: &Rect, buffer: f32) -> bool {
    a.buffered(buffer).intersects(&b.buffered(buffer))
}

pub fn overlaps(a: &Division, b: &Division, positions: &PositionMap, buffer: f32) -> bool {
    rects_overlap(
        &effective_rect(a, positions),
        &effective_rect(b, positions),
        buffer,
    )
}

/// Every overlapping pair `(i, j)` with `i < j`, in scan order.
pub fn overlapping_pairs(
    divisions: &[Division],
    positions: &PositionMap,
    buffer: f32,
) -> Vec<(usize, usize)> {
    let rects: Vec<Rect> = divisions
        .iter()
        .map(|division| effective_rect(division, positions))
        .collect();
    let mut pairs = Vec::new();
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects_overlap(&rects[i], &rects[j], buffer) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

pub fn has_overlaps(divisions: &[Division], positions: &PositionMap, buffer: f32) -> bool {
    let rects: Vec<Rect> = divisions
        .iter()
        .map(|division| effective_rect(division, positions))
        .collect();
    rects.iter().enumerate().any(|(i, a)| {
        rects[i + 1..]
            .iter()
            .any(|b| rects_overlap(a, b, buffer))
    })
}

/// Number of `existing` divisions that `candidate` conflicts with.
pub(crate) fn count_conflicts(
    candidate: &Rect,
    existing: &[Division],
    positions: &PositionMap,
    buffer: f32,
) -> usize {
    existing
        .iter()
        .filter(|division| rects_overlap(candidate, &effective_rect(division, positions), buffer))
        .count()
}
