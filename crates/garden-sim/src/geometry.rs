//! Geometry helpers: segment distance, polygon membership, board quadrants.

use glam::DVec2;

use garden_core::maps::MapData;
use garden_core::types::{BoardSize, NormPoint};

/// Shortest distance from `point` to the segment `a`-`b`.
/// A degenerate segment (`a == b`) gives the point-to-point distance.
pub fn distance_to_segment(point: DVec2, a: DVec2, b: DVec2) -> f64 {
    point.distance(closest_point_on_segment(point, a, b))
}

/// Projection of `point` onto the segment `a`-`b`, clamped to its ends.
pub fn closest_point_on_segment(point: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Even-odd ray cast. Both the point and the polygon are in normalized space.
pub fn point_in_polygon(point: NormPoint, polygon: &[NormPoint]) -> bool {
    let mut inside = false;
    if polygon.is_empty() {
        return inside;
    }
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether a pixel position counts as water on this map.
/// Glass-floor maps are water everywhere.
pub fn in_water(point: DVec2, map: &MapData, board: BoardSize) -> bool {
    if map.glass_floor {
        return true;
    }
    let norm = board.normalize(point);
    map.water_zones
        .iter()
        .any(|zone| point_in_polygon(norm, zone))
}

/// Board quadrant of a pixel position: 0 bottom-left, 1 top-left,
/// 2 top-right, 3 bottom-right.
pub fn quadrant_of(point: DVec2, board: BoardSize) -> u8 {
    let left = point.x < board.width * 0.5;
    let top = point.y < board.height * 0.5;
    match (left, top) {
        (true, false) => 0,
        (true, true) => 1,
        (false, true) => 2,
        (false, false) => 3,
    }
}

/// A map path scaled into pixel space.
pub fn path_in_pixels(path: &[NormPoint], board: BoardSize) -> Vec<DVec2> {
    path.iter().map(|p| p.to_board(board)).collect()
}

/// Nearest point on any segment of the given pixel-space paths.
pub fn nearest_point_on_paths(point: DVec2, paths: &[Vec<DVec2>]) -> Option<DVec2> {
    paths
        .iter()
        .flat_map(|path| path.windows(2))
        .map(|seg| closest_point_on_segment(point, seg[0], seg[1]))
        .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
}
