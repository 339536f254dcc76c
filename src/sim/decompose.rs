//! Shape decomposition
//!
//! Splits a shape's bounding box into piece footprints. Two strategies:
//! - `Grid`: row-major rectangular cells, no randomness
//! - `Voronoi`: seeded random sites, one clipped cell per site
//!
//! Voronoi cells can collapse at the clip boundary (or when two sites
//! coincide). Those sites are skipped, so the emitted count may fall short of
//! the request. Callers read `Decomposition::emitted()` instead of assuming.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Rect};
use super::shape::Shape;
use super::state::{PieceId, PieceSpec};
use crate::error::{PuzzleError, Result};

/// Decomposition algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Grid,
    Voronoi,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Grid => "grid",
            Strategy::Voronoi => "voronoi",
        }
    }
}

/// Output of a decomposition run
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Emitted pieces, ids 1..=emitted
    pub pieces: Vec<PieceSpec>,
    /// Piece count the caller asked for
    pub requested: usize,
}

impl Decomposition {
    pub fn emitted(&self) -> usize {
        self.pieces.len()
    }

    /// Requested pieces lost to degenerate cells
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.pieces.len())
    }

    pub fn is_partial(&self) -> bool {
        self.shortfall() > 0
    }
}

/// Grid dimensions `(rows, cols)` with `rows * cols >= count`
pub fn grid_dims(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (rows, cols)
}

/// Decompose with a fresh RNG seeded from `seed`
pub fn decompose(
    shape: &Shape,
    piece_count: usize,
    strategy: Strategy,
    seed: u64,
) -> Result<Decomposition> {
    let mut rng = Pcg32::seed_from_u64(seed);
    decompose_with_rng(shape, piece_count, strategy, &mut rng)
}

/// Decompose drawing from a caller-owned RNG (so scatter can continue the stream)
pub fn decompose_with_rng<R: Rng>(
    shape: &Shape,
    piece_count: usize,
    strategy: Strategy,
    rng: &mut R,
) -> Result<Decomposition> {
    if piece_count == 0 {
        return Err(PuzzleError::invalid("piece count must be positive"));
    }
    let bounds = shape.bounds();
    if bounds.area() <= geometry::EPSILON {
        return Err(PuzzleError::invalid("shape has zero area"));
    }

    let pieces = match strategy {
        Strategy::Grid => grid_pieces(bounds, piece_count),
        Strategy::Voronoi => {
            let seeds: Vec<Vec2> = (0..piece_count)
                .map(|_| {
                    let u = Vec2::new(rng.random::<f32>(), rng.random::<f32>());
                    bounds.min + bounds.size() * u
                })
                .collect();
            voronoi_pieces(bounds, &seeds)
        }
    };

    let decomposition = Decomposition {
        pieces,
        requested: piece_count,
    };
    if decomposition.is_partial() {
        log::warn!(
            "{} decomposition emitted {} of {} pieces",
            strategy.as_str(),
            decomposition.emitted(),
            piece_count
        );
    }
    Ok(decomposition)
}

/// Row-major grid cells over `bounds`; the first `count` cells are kept
fn grid_pieces(bounds: Rect, count: usize) -> Vec<PieceSpec> {
    let (rows, cols) = grid_dims(count);
    let cell = Vec2::new(bounds.size().x / cols as f32, bounds.size().y / rows as f32);
    let local = Rect::from_center(Vec2::ZERO, cell).corners();

    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            let target =
                bounds.min + Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y);
            PieceSpec::new(i as PieceId + 1, local.clone(), target)
        })
        .collect()
}

/// Voronoi cell of each site, clipped to `bounds`, in world coordinates.
///
/// `None` marks a degenerate cell: fewer than 3 distinct vertices after
/// clipping, no area, or a site coinciding with an earlier one.
pub fn voronoi_cells(bounds: Rect, sites: &[Vec2]) -> Vec<Option<Vec<Vec2>>> {
    sites
        .iter()
        .enumerate()
        .map(|(i, &site)| {
            if sites[..i]
                .iter()
                .any(|&earlier| geometry::distance(earlier, site) < geometry::EPSILON)
            {
                return None;
            }
            let mut cell = bounds.corners();
            for (j, &other) in sites.iter().enumerate() {
                if i == j || geometry::distance(other, site) < geometry::EPSILON {
                    continue;
                }
                // Keep the half-plane closer to `site` than to `other`
                let midpoint = (site + other) * 0.5;
                cell = geometry::clip_half_plane(&cell, midpoint, other - site);
                if cell.is_empty() {
                    break;
                }
            }
            geometry::dedup_vertices(&mut cell);
            if cell.len() < 3 || geometry::polygon_area(&cell) <= geometry::EPSILON {
                return None;
            }
            Some(cell)
        })
        .collect()
}

fn voronoi_pieces(bounds: Rect, sites: &[Vec2]) -> Vec<PieceSpec> {
    let mut pieces = Vec::with_capacity(sites.len());
    for (index, cell) in voronoi_cells(bounds, sites).into_iter().enumerate() {
        let Some(cell) = cell else {
            log::warn!("Skipping degenerate Voronoi cell for site {}", index);
            continue;
        };
        let Some(center) = geometry::centroid(&cell) else {
            continue;
        };
        let local = geometry::translate(&cell, -center);
        pieces.push(PieceSpec::new(pieces.len() as PieceId + 1, local, center));
    }
    pieces
}
