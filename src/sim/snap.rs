//! Snap resolution
//!
//! Decides whether a piece has come close enough to lock. Two policies:
//! - `Absolute`: on release, compare the piece position with its target
//! - `Adjacency`: every tick, compare a moving piece's edges with the edges
//!   of locked pieces and lock it flush against the first one in range
//!
//! Thresholds are world units, fixed for the lifetime of a puzzle.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Rect};
use super::state::{Piece, PieceId, PieceRole};
use crate::error::{PuzzleError, Result};

/// Independent X/Y thresholds for adjacency snapping.
///
/// For side-by-side pairs `x` bounds the gap between the facing edges and
/// `y` bounds the vertical misalignment; stacked pairs swap the roles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyThresholds {
    pub x: f32,
    pub y: f32,
}

/// Snap rule for a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SnapPolicy {
    Absolute { threshold: f32 },
    Adjacency(AdjacencyThresholds),
}

impl Default for SnapPolicy {
    fn default() -> Self {
        SnapPolicy::Absolute {
            threshold: crate::consts::DEFAULT_SNAP_THRESHOLD,
        }
    }
}

impl SnapPolicy {
    pub fn absolute(threshold: f32) -> Self {
        SnapPolicy::Absolute { threshold }
    }

    pub fn adjacency(x: f32, y: f32) -> Self {
        SnapPolicy::Adjacency(AdjacencyThresholds { x, y })
    }

    /// Adjacency is re-evaluated every tick, absolute only on release
    pub fn per_tick(&self) -> bool {
        matches!(self, SnapPolicy::Adjacency(_))
    }

    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            SnapPolicy::Absolute { threshold } => threshold.is_finite() && threshold > 0.0,
            SnapPolicy::Adjacency(AdjacencyThresholds { x, y }) => {
                x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(PuzzleError::invalid(format!("snap threshold must be positive: {self:?}")))
        }
    }
}

/// Result of a single snap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapOutcome {
    /// Locked by this attempt
    Snapped,
    /// Out of range; left where it was released
    Free,
    /// Already locked; nothing changed
    AlreadySnapped,
}

/// Absolute-position check, run when a drag ends.
///
/// Idempotent: a piece that is already snapped is left untouched.
pub fn resolve_absolute(piece: &mut Piece, threshold: f32) -> SnapOutcome {
    if piece.is_snapped() {
        return SnapOutcome::AlreadySnapped;
    }
    piece.drop_free();
    let d = geometry::distance(piece.position, piece.target());
    if d < threshold {
        let target = piece.target();
        piece.lock_at(target);
        log::debug!("Piece {} snapped (distance {:.1})", piece.id(), d);
        SnapOutcome::Snapped
    } else {
        log::debug!("Piece {} released {:.1} from target", piece.id(), d);
        SnapOutcome::Free
    }
}

/// Where the moving piece sits relative to its stationary partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    /// Moving piece's left edge meets the partner's right edge
    RightOf,
    /// Moving piece's right edge meets the partner's left edge
    LeftOf,
    /// Moving piece's bottom edge meets the partner's top edge (y down)
    Above,
    /// Moving piece's top edge meets the partner's bottom edge
    Below,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::RightOf, Edge::LeftOf, Edge::Above, Edge::Below];

    /// Bounds center that puts `moving` flush against `stationary` on this
    /// edge, if the pair is within `t`
    pub fn flush_center(
        self,
        moving: Rect,
        stationary: Rect,
        t: AdjacencyThresholds,
    ) -> Option<Vec2> {
        let half = moving.half_extent();
        let (m, s) = (moving.center(), stationary.center());
        let (gap, lateral, flush) = match self {
            Edge::RightOf => (
                (moving.min.x - stationary.max.x).abs() < t.x,
                (m.y - s.y).abs() <= t.y,
                Vec2::new(stationary.max.x + half.x, s.y),
            ),
            Edge::LeftOf => (
                (moving.max.x - stationary.min.x).abs() < t.x,
                (m.y - s.y).abs() <= t.y,
                Vec2::new(stationary.min.x - half.x, s.y),
            ),
            Edge::Above => (
                (moving.max.y - stationary.min.y).abs() < t.y,
                (m.x - s.x).abs() <= t.x,
                Vec2::new(s.x, stationary.min.y - half.y),
            ),
            Edge::Below => (
                (moving.min.y - stationary.max.y).abs() < t.y,
                (m.x - s.x).abs() <= t.x,
                Vec2::new(s.x, stationary.max.y + half.y),
            ),
        };
        (gap && lateral).then_some(flush)
    }
}

/// One lock made by the adjacency pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencySnap {
    pub id: PieceId,
    pub partner: PieceId,
    pub edge: Edge,
}

/// Adjacency pass over all unsnapped moving pieces, in id order.
///
/// Partners are anchors or pieces that are already locked, including ones
/// locked earlier in the same pass. O(unsnapped × pieces) per call.
pub fn resolve_adjacency(
    pieces: &mut BTreeMap<PieceId, Piece>,
    thresholds: AdjacencyThresholds,
) -> Vec<AdjacencySnap> {
    let candidates: Vec<PieceId> = pieces
        .values()
        .filter(|p| p.role == PieceRole::Moving && !p.is_snapped())
        .map(Piece::id)
        .collect();

    let mut snaps = Vec::new();
    for id in candidates {
        let Some(moving) = pieces.get(&id) else {
            continue;
        };
        let moving_bounds = moving.world_bounds();

        let found = pieces
            .values()
            .filter(|p| p.id() != id && p.is_snapped())
            .find_map(|partner| {
                let partner_bounds = partner.world_bounds();
                Edge::ALL.iter().find_map(|&edge| {
                    edge.flush_center(moving_bounds, partner_bounds, thresholds)
                        .map(|center| (partner.id(), edge, center))
                })
            });

        let Some((partner, edge, bounds_center)) = found else {
            continue;
        };
        if let Some(piece) = pieces.get_mut(&id) {
            let center = piece.center_for_bounds_center(bounds_center);
            piece.lock_at(center);
            log::debug!("Piece {} snapped {:?} piece {}", id, edge, partner);
            snaps.push(AdjacencySnap { id, partner, edge });
        }
    }
    snaps
}
