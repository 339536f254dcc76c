//! Deterministic puzzle simulation
//!
//! All puzzle logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only, threaded explicitly through decomposition and scatter
//! - Stable iteration order (by piece ID)
//! - No rendering, audio or platform dependencies

pub mod decompose;
pub mod geometry;
pub mod scatter;
pub mod shape;
pub mod snap;
pub mod state;
pub mod tick;

pub use decompose::{Decomposition, Strategy, decompose, decompose_with_rng, grid_dims};
pub use geometry::Rect;
pub use shape::Shape;
pub use snap::{AdjacencySnap, AdjacencyThresholds, Edge, SnapOutcome, SnapPolicy};
pub use state::{
    Piece, PieceId, PieceRole, PieceSpec, PieceState, PuzzleEvent, PuzzleState, RngState,
};
pub use tick::{AutoSolver, FeedbackSink, InputSource, PointerEvent, PuzzleController, Renderer};
