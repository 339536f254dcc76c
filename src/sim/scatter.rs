//! Scatter placement
//!
//! Random initial positions that keep every piece on the canvas. Pieces may
//! overlap each other; no separation pass is run.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;

use super::geometry::{self, Rect};
use super::state::{PieceId, PieceSpec};

/// Draw a start position for each piece.
///
/// The draw is uniform over `canvas` shrunk by the piece's half-extent, then
/// clamped into `[canvas.min + margin, canvas.max - margin]` on both axes.
pub fn place<R: Rng>(
    specs: &[PieceSpec],
    canvas: Rect,
    margin: f32,
    rng: &mut R,
) -> BTreeMap<PieceId, Vec2> {
    let lo_margin = canvas.min + Vec2::splat(margin);
    let hi_margin = canvas.max - Vec2::splat(margin);

    specs
        .iter()
        .map(|spec| {
            let half = spec.half_extent();
            let lo = canvas.min + half;
            let hi = canvas.max - half;
            let u = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
            let drawn = Vec2::new(
                draw_axis(lo.x, hi.x, u.x, canvas.center().x),
                draw_axis(lo.y, hi.y, u.y, canvas.center().y),
            );
            let position = Vec2::new(
                geometry::clamp(drawn.x, lo_margin.x, hi_margin.x),
                geometry::clamp(drawn.y, lo_margin.y, hi_margin.y),
            );
            (spec.id, position)
        })
        .collect()
}

/// Uniform draw on `[lo, hi]`; pieces wider than the canvas go to the middle
#[inline]
fn draw_axis(lo: f32, hi: f32, u: f32, middle: f32) -> f32 {
    if lo > hi {
        middle
    } else {
        lo + (hi - lo) * u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::decompose::{Strategy, decompose};
    use crate::sim::shape::Shape;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pieces(count: usize, strategy: Strategy) -> Vec<PieceSpec> {
        let shape = Shape::rect(Vec2::new(100.0, 100.0), 200.0, 200.0).unwrap();
        decompose(&shape, count, strategy, 3).unwrap().pieces
    }

    #[test]
    fn test_whole_piece_stays_on_canvas() {
        let specs = pieces(12, Strategy::Grid);
        let canvas = Rect::from_size(600.0, 400.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let placed = place(&specs, canvas, 0.0, &mut rng);
        assert_eq!(placed.len(), specs.len());
        for spec in &specs {
            let bounds = spec.local_bounds().translated(placed[&spec.id]);
            assert!(bounds.min.x >= -1e-3 && bounds.min.y >= -1e-3);
            assert!(bounds.max.x <= 600.0 + 1e-3 && bounds.max.y <= 400.0 + 1e-3);
        }
    }

    #[test]
    fn test_oversized_piece_is_centered() {
        let specs = pieces(1, Strategy::Grid); // 200x200 piece
        let canvas = Rect::from_size(150.0, 150.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let placed = place(&specs, canvas, 10.0, &mut rng);
        assert_eq!(placed[&1], Vec2::new(75.0, 75.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let specs = pieces(10, Strategy::Voronoi);
        let canvas = Rect::from_size(1170.0, 2532.0);
        let a = place(&specs, canvas, 50.0, &mut Pcg32::seed_from_u64(9));
        let b = place(&specs, canvas, 50.0, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn positions_respect_margin(
            seed in any::<u64>(),
            count in 1usize..20,
            width in 100.0f32..2000.0,
            height in 100.0f32..2000.0,
            margin in 0.0f32..50.0,
        ) {
            let specs = pieces(count, Strategy::Voronoi);
            let canvas = Rect::from_size(width, height);
            let placed = place(&specs, canvas, margin, &mut Pcg32::seed_from_u64(seed));
            for pos in placed.values() {
                prop_assert!(pos.x >= margin && pos.x <= width - margin);
                prop_assert!(pos.y >= margin && pos.y <= height - margin);
            }
        }
    }
}
