//! Puzzle state and core piece types
//!
//! Everything needed to reproduce an attempt (seed, piece set, drag state)
//! lives here. Mutation goes through the controller in `tick.rs`.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::decompose::{self, Decomposition};
use super::geometry::{self, Rect};
use super::scatter;
use super::snap::SnapPolicy;
use crate::error::{PuzzleError, Result};
use crate::settings::PuzzleConfig;

/// Stable piece identifier (1..=N)
pub type PieceId = u32;

/// Immutable geometry of one piece, as produced by decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    pub id: PieceId,
    /// Outline relative to the piece center
    pub vertices: Vec<Vec2>,
    /// Piece center in shape/world coordinates when solved
    pub target: Vec2,
}

impl PieceSpec {
    pub fn new(id: PieceId, vertices: Vec<Vec2>, target: Vec2) -> Self {
        Self {
            id,
            vertices,
            target,
        }
    }

    /// Bounds of the local outline
    pub fn local_bounds(&self) -> Rect {
        geometry::bounding_box(&self.vertices).unwrap_or(Rect::new(Vec2::ZERO, Vec2::ZERO))
    }

    /// Largest distance from the piece center to its bounds on each axis
    pub fn half_extent(&self) -> Vec2 {
        let bounds = self.local_bounds();
        bounds.min.abs().max(bounds.max.abs())
    }

    /// Outline placed with its center at `center`
    pub fn world_polygon(&self, center: Vec2) -> Vec<Vec2> {
        geometry::translate(&self.vertices, center)
    }
}

/// Piece lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PieceState {
    /// Interactive, waiting to be picked up
    #[default]
    Free,
    /// Following the pointer
    Dragging,
    /// Locked in place; terminal
    Snapped,
}

/// Whether a piece takes part in snapping as the mover or the fixed partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PieceRole {
    #[default]
    Moving,
    /// Placed at its target and locked before play starts
    Anchor,
}

/// A piece during play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub spec: PieceSpec,
    /// Current position (piece center plus `local_offset`)
    pub position: Vec2,
    /// Unused for now; kept for renderers that want it
    pub rotation: f32,
    pub state: PieceState,
    /// Correction for the anchor the outline was authored against
    pub local_offset: Vec2,
    pub role: PieceRole,
    /// Where the piece locks. Starts at the authored target; adjacency
    /// snapping moves it to the flush position.
    target: Vec2,
}

impl Piece {
    pub fn new(spec: PieceSpec, position: Vec2) -> Self {
        let target = spec.target;
        Self {
            spec,
            position,
            rotation: 0.0,
            state: PieceState::Free,
            local_offset: Vec2::ZERO,
            role: PieceRole::Moving,
            target,
        }
    }

    /// Anchor piece: sits on its target, already locked
    pub fn anchor(spec: PieceSpec) -> Self {
        let mut piece = Self::new(spec, Vec2::ZERO);
        piece.role = PieceRole::Anchor;
        piece.lock_at(piece.target);
        piece
    }

    pub fn with_local_offset(mut self, offset: Vec2) -> Self {
        self.position += offset - self.local_offset;
        self.local_offset = offset;
        self
    }

    pub fn id(&self) -> PieceId {
        self.spec.id
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Piece center in world space
    pub fn center(&self) -> Vec2 {
        self.position - self.local_offset
    }

    pub fn world_polygon(&self) -> Vec<Vec2> {
        self.spec.world_polygon(self.center())
    }

    pub fn world_bounds(&self) -> Rect {
        self.spec.local_bounds().translated(self.center())
    }

    /// Footprint at the solved position
    pub fn target_polygon(&self) -> Vec<Vec2> {
        self.spec.world_polygon(self.target)
    }

    pub fn is_snapped(&self) -> bool {
        self.state == PieceState::Snapped
    }

    pub fn is_dragging(&self) -> bool {
        self.state == PieceState::Dragging
    }

    pub fn is_interactive(&self) -> bool {
        self.state == PieceState::Free
    }

    /// Pointer hit test, with `slop` world units of tolerance around the outline
    pub fn hit(&self, point: Vec2, slop: f32) -> bool {
        let polygon = self.world_polygon();
        if geometry::contains_point(&polygon, point) {
            return true;
        }
        slop > 0.0 && geometry::distance_to_boundary(&polygon, point).is_some_and(|d| d <= slop)
    }

    /// Free -> Dragging
    pub(crate) fn grab(&mut self) -> bool {
        if self.state != PieceState::Free {
            return false;
        }
        self.state = PieceState::Dragging;
        true
    }

    /// Track the pointer 1:1 while dragging
    pub(crate) fn drag_to(&mut self, pointer: Vec2) -> bool {
        if self.state != PieceState::Dragging {
            return false;
        }
        self.position = pointer;
        true
    }

    /// Dragging -> Free (the snap resolver may lock it afterwards)
    pub(crate) fn drop_free(&mut self) {
        if self.state == PieceState::Dragging {
            self.state = PieceState::Free;
        }
    }

    /// Lock with center at `target`
    pub(crate) fn lock_at(&mut self, target: Vec2) {
        self.target = target;
        self.position = target + self.local_offset;
        self.state = PieceState::Snapped;
    }

    /// Position that puts the center of the world bounds at `bounds_center`
    pub(crate) fn center_for_bounds_center(&self, bounds_center: Vec2) -> Vec2 {
        bounds_center - self.spec.local_bounds().center()
    }
}

/// Notifications for the feedback collaborator (audio/visual cues)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    PieceGrabbed { id: PieceId },
    PieceReleased { id: PieceId },
    PieceSnapped { id: PieceId },
    PuzzleComplete,
    HintsToggled { visible: bool },
    Restarted { seed: u64 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Full state of one puzzle attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleState {
    /// Attempt seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub policy: SnapPolicy,
    pub canvas: Rect,
    /// Extra pointer tolerance around piece outlines
    pub hit_slop: f32,
    /// Easy mode: draw target outlines
    pub show_hints: bool,
    /// Pieces asked of the decomposer (may exceed `len()` for Voronoi)
    pub requested: usize,
    /// Completed drags
    pub moves: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) pieces: BTreeMap<PieceId, Piece>,
    /// Draw/hit order, bottom first
    pub(crate) z_order: Vec<PieceId>,
    pub(crate) dragging: Option<PieceId>,
}

impl PuzzleState {
    /// Decompose, scatter and lay out a new attempt from configuration
    pub fn new(config: &PuzzleConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let shape = config.shape.build()?;
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();

        let Decomposition { pieces: specs, requested } =
            decompose::decompose_with_rng(&shape, config.piece_count, config.strategy, &mut rng)?;

        if let Some(missing) = config
            .anchor_ids
            .iter()
            .find(|id| !specs.iter().any(|s| s.id == **id))
        {
            return Err(PuzzleError::invalid(format!("unknown anchor piece id {missing}")));
        }

        let canvas = config.canvas();
        let positions = scatter::place(&specs, canvas, config.scatter_margin, &mut rng);

        let pieces = specs
            .into_iter()
            .map(|spec| {
                if config.anchor_ids.contains(&spec.id) {
                    Piece::anchor(spec)
                } else {
                    let position = positions.get(&spec.id).copied().unwrap_or(spec.target);
                    Piece::new(spec, position)
                }
            })
            .collect();

        let mut state = Self::with_pieces(pieces, config.snap, canvas)?;
        state.seed = seed;
        state.rng_state = rng_state;
        state.requested = requested;
        state.hit_slop = config.hit_slop;
        state.show_hints = config.show_hints;

        log::info!(
            "Puzzle created: {} pieces ({:?}), seed {}",
            state.len(),
            config.strategy,
            seed
        );
        Ok(state)
    }

    /// Build a state from hand-placed pieces (no decomposition)
    pub fn with_pieces(pieces: Vec<Piece>, policy: SnapPolicy, canvas: Rect) -> Result<Self> {
        policy.validate()?;
        if pieces.is_empty() {
            return Err(PuzzleError::invalid("puzzle needs at least one piece"));
        }
        let requested = pieces.len();
        let mut map = BTreeMap::new();
        for piece in pieces {
            if piece.spec.vertices.len() < 3 {
                return Err(PuzzleError::invalid(format!(
                    "piece {} has fewer than 3 vertices",
                    piece.id()
                )));
            }
            let id = piece.id();
            if map.insert(id, piece).is_some() {
                return Err(PuzzleError::invalid(format!("duplicate piece id {id}")));
            }
        }
        let z_order = map.keys().copied().collect();
        Ok(Self {
            seed: 0,
            rng_state: RngState::new(0),
            policy,
            canvas,
            hit_slop: 0.0,
            show_hints: false,
            requested,
            moves: 0,
            time_ticks: 0,
            pieces: map,
            z_order,
            dragging: None,
        })
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Pieces the decomposer could not produce
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.len())
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// Pieces in id order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Pieces in draw order, top-most first
    pub fn pieces_top_down(&self) -> impl Iterator<Item = &Piece> {
        self.z_order.iter().rev().filter_map(|id| self.pieces.get(id))
    }

    /// Piece currently following the pointer
    pub fn dragging(&self) -> Option<PieceId> {
        self.dragging
    }

    pub fn snapped_count(&self) -> usize {
        self.pieces.values().filter(|p| p.is_snapped()).count()
    }

    /// True iff every piece is snapped. Always recomputed.
    pub fn is_complete(&self) -> bool {
        self.pieces.values().all(Piece::is_snapped)
    }

    /// Top-most free piece under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<PieceId> {
        self.pieces_top_down()
            .filter(|p| p.is_interactive())
            .find(|p| p.hit(point, self.hit_slop))
            .map(Piece::id)
    }

    /// Move a piece to the top of the draw order
    pub(crate) fn raise(&mut self, id: PieceId) {
        if let Some(idx) = self.z_order.iter().position(|&z| z == id) {
            self.z_order.remove(idx);
            self.z_order.push(id);
        }
    }

    /// Target footprints in world space (easy-mode overlay), id order
    pub fn hint_outlines(&self) -> Vec<(PieceId, Vec<Vec2>)> {
        self.pieces
            .values()
            .map(|p| (p.id(), p.target_polygon()))
            .collect()
    }
}
