// UTILS

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Polygon;

/// Computes the signed area of a polygon (positive for CCW winding)
/// # Returns the polygon's area as an `f32`. Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let n = polygon.len();
    let mut area = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        area += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }

    area / 2.0
}

/// Unsigned shoelace area, winding does not matter
pub fn calculate_polygon_area(polygon: &[Vec2]) -> f32 {
    polygon_area(polygon).abs()
}

/// Calculates the area-weighted centroid of a polygon
/// Returns `Vec2::ZERO` for degenerate polygons.
pub fn polygon_centroid(polygon: &[Vec2], area: f32) -> Vec2 {
    if polygon.len() < 3 || area == 0.0 {
        return Vec2::ZERO;
    }

    let n = polygon.len();
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;

    for i in 0..n {
        let j = (i + 1) % n;
        let p = polygon[i].x as f64 * polygon[j].y as f64 - polygon[j].x as f64 * polygon[i].y as f64;
        cx += (polygon[i].x + polygon[j].x) as f64 * p;
        cy += (polygon[i].y + polygon[j].y) as f64 * p;
    }

    let area_6 = 6.0 * area as f64;
    Vec2::new((cx / area_6) as f32, (cy / area_6) as f32)
}

/// Average of the vertices. This is what placement measures distances from,
/// it stays stable for the jittery, slightly self-intersecting room outlines.
pub fn calculate_centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::ZERO;
    }
    vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32
}

/// Largest distance from `centroid` to any vertex
pub fn calculate_max_radius(vertices: &[Vec2], centroid: Vec2) -> f32 {
    vertices
        .iter()
        .map(|v| v.distance(centroid))
        .fold(0.0, f32::max)
}

/// Determines whether a point is inside a polygon using the ray-casting algorithm (even-odd rule).
/// # Returns `true` if the point is inside the polygon, otherwise `false`.
pub fn is_point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let yi = polygon[i].y;
        let yj = polygon[j].y;
        let xi = polygon[i].x;
        let xj = polygon[j].x;

        if ((yi > point.y) != (yj > point.y)) &&
           (point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Axis-aligned bounds of a polygon
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// # Returns `None` for an empty polygon
pub fn polygon_bounds(polygon: &[Vec2]) -> Option<Bounds> {
    if polygon.is_empty() {
        return None;
    }

    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for v in polygon {
        min = min.min(*v);
        max = max.max(*v);
    }

    Some(Bounds { min, max })
}

/// ≥3 vertices, all finite
pub fn is_valid_polygon(polygon: &Polygon) -> bool {
    polygon.len() >= 3 && polygon.iter().all(|v| v.is_finite())
}
