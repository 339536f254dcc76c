//! Polygon and point math
//!
//! Pure functions over `Vec2` slices. Nothing here holds state; callers pass
//! vertices in whatever space they care about (piece-local or world).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing areas and collapsing vertices
pub const EPSILON: f32 = 1e-4;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin (canvas bounds)
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extent(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn area(&self) -> f32 {
        let size = self.size();
        size.x * size.y
    }

    /// Corners in clockwise screen order (y down): top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> Vec<Vec2> {
        vec![
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Same rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

/// Arithmetic mean of the vertices.
///
/// Returns `None` for an empty slice.
pub fn centroid(vertices: &[Vec2]) -> Option<Vec2> {
    if vertices.is_empty() {
        return None;
    }
    let sum: Vec2 = vertices.iter().copied().sum();
    Some(sum / vertices.len() as f32)
}

/// Axis-aligned extents of the vertices (`None` for an empty slice)
pub fn bounding_box(vertices: &[Vec2]) -> Option<Rect> {
    let first = *vertices.first()?;
    let (min, max) = vertices
        .iter()
        .skip(1)
        .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
    Some(Rect::new(min, max))
}

/// Euclidean distance
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Standard clamp.
///
/// Unlike `f32::clamp` this never panics: if `lo > hi` the result is `hi`.
#[inline]
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Distance from `p` to the segment `a`-`b`
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq < EPSILON * EPSILON {
        return distance(p, a); // Degenerate segment
    }
    let t = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    distance(p, a + seg * t)
}

/// Distance from `p` to the nearest polygon edge (`None` for an empty polygon)
pub fn distance_to_boundary(polygon: &[Vec2], p: Vec2) -> Option<f32> {
    match polygon.len() {
        0 => None,
        1 => Some(distance(p, polygon[0])),
        n => (0..n)
            .map(|i| distance_to_segment(p, polygon[i], polygon[(i + 1) % n]))
            .reduce(f32::min),
    }
}

/// Even-odd point-in-polygon test.
///
/// Works for concave polygons; polygons with fewer than 3 vertices contain nothing.
pub fn contains_point(polygon: &[Vec2], point: Vec2) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Signed shoelace area (positive for counter-clockwise in y-up space)
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum();
    twice * 0.5
}

/// Unsigned polygon area
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    signed_area(polygon).abs()
}

/// Copy of `polygon` moved by `offset`
pub fn translate(polygon: &[Vec2], offset: Vec2) -> Vec<Vec2> {
    polygon.iter().map(|&v| v + offset).collect()
}

/// Drop consecutive vertices closer than `EPSILON` (including the wrap-around pair)
pub fn dedup_vertices(polygon: &mut Vec<Vec2>) {
    polygon.dedup_by(|a, b| distance(*a, *b) < EPSILON);
    while polygon.len() > 1 {
        let (first, last) = (polygon[0], polygon[polygon.len() - 1]);
        if distance(first, last) < EPSILON {
            polygon.pop();
        } else {
            break;
        }
    }
}

/// Sutherland-Hodgman clip of a convex-or-not polygon against the half-plane
/// `{ p : (p - origin) · normal <= 0 }`
pub fn clip_half_plane(polygon: &[Vec2], origin: Vec2, normal: Vec2) -> Vec<Vec2> {
    let n = polygon.len();
    let mut out = Vec::with_capacity(n + 1);
    if n == 0 {
        return out;
    }
    let side = |p: Vec2| (p - origin).dot(normal);
    for i in 0..n {
        let current = polygon[i];
        let next = polygon[(i + 1) % n];
        let (dc, dn) = (side(current), side(next));
        if dc <= 0.0 {
            out.push(current);
        }
        if (dc <= 0.0) != (dn <= 0.0) {
            let t = dc / (dc - dn);
            out.push(current + (next - current) * t);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        Rect::from_size(10.0, 10.0).corners()
    }

    #[test]
    fn test_centroid_is_vertex_mean() {
        let c = centroid(&[Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(2.0, 6.0)]);
        assert_eq!(c, Some(Vec2::new(2.0, 2.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_bounding_box() {
        let points = [Vec2::new(3.0, -1.0), Vec2::new(-2.0, 5.0), Vec2::new(1.0, 1.0)];
        let bb = bounding_box(&points).unwrap();
        assert_eq!(bb.min, Vec2::new(-2.0, -1.0));
        assert_eq!(bb.max, Vec2::new(3.0, 5.0));
        assert!(bounding_box(&[]).is_none());
    }

    #[test]
    fn test_clamp_never_panics() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        // Inverted range collapses to hi
        assert_eq!(clamp(3.0, 8.0, 2.0), 2.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-5);
        // Past the end: distance to endpoint
        assert!((distance_to_segment(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-5);
        // Degenerate segment
        assert!((distance_to_segment(Vec2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_contains_point_square() {
        let sq = square();
        assert!(contains_point(&sq, Vec2::new(5.0, 5.0)));
        assert!(!contains_point(&sq, Vec2::new(15.0, 5.0)));
        assert!(!contains_point(&sq, Vec2::new(5.0, -0.5)));
    }

    #[test]
    fn test_contains_point_concave() {
        // L shape: the notch at the top-right is outside
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 4.0),
        ];
        assert!(contains_point(&l, Vec2::new(1.0, 3.0)));
        assert!(contains_point(&l, Vec2::new(3.0, 1.0)));
        assert!(!contains_point(&l, Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_area_and_clip() {
        let sq = square();
        assert!((polygon_area(&sq) - 100.0).abs() < 1e-4);

        // Keep the left half (x <= 5)
        let half = clip_half_plane(&sq, Vec2::new(5.0, 0.0), Vec2::X);
        assert!((polygon_area(&half) - 50.0).abs() < 1e-4);
        let bb = bounding_box(&half).unwrap();
        assert!((bb.max.x - 5.0).abs() < 1e-5);

        // Clip away everything
        let none = clip_half_plane(&sq, Vec2::new(-1.0, 0.0), Vec2::X);
        assert!(none.is_empty());
    }

    #[test]
    fn test_dedup_vertices_wraps() {
        let mut poly = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.00001, 0.0),
        ];
        dedup_vertices(&mut poly);
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn test_distance_to_boundary() {
        let sq = square();
        let d = distance_to_boundary(&sq, Vec2::new(5.0, 1.0)).unwrap();
        assert!((d - 1.0).abs() < 1e-5);
        assert!(distance_to_boundary(&[], Vec2::ZERO).is_none());
    }
}
