//! Shard Puzzle - a shape-disassembly puzzle engine
//!
//! A silhouette is cut into pieces, the pieces are scattered, and the player
//! drags each one back until it locks.
//!
//! Core modules:
//! - `sim`: Deterministic puzzle logic (decomposition, scatter, drag, snapping)
//! - `settings`: Puzzle configuration (JSON)
//! - `stages`: Built-in stage catalog
//! - `records`: Best-run leaderboard per stage

pub mod error;
pub mod records;
pub mod settings;
pub mod sim;
pub mod stages;

pub use error::{PuzzleError, Result};
pub use records::{BestRuns, StageRecords};
pub use settings::{PuzzleConfig, ShapeConfig};

/// Puzzle configuration constants
pub mod consts {
    /// Logical canvas size (portrait phone layout)
    pub const CANVAS_WIDTH: f32 = 1170.0;
    pub const CANVAS_HEIGHT: f32 = 2532.0;

    /// Side of the default square silhouette
    pub const SHAPE_SIZE: f32 = 200.0;
    pub const DEFAULT_PIECE_COUNT: usize = 10;

    /// Release distance (world units) under which a piece locks
    pub const DEFAULT_SNAP_THRESHOLD: f32 = 20.0;

    /// Adjacency mode: max gap between facing edges / max misalignment
    pub const ADJACENCY_SNAP_X: f32 = 50.0;
    pub const ADJACENCY_SNAP_Y: f32 = 100.0;

    /// Keep scattered pieces this far from the canvas edge
    pub const SCATTER_MARGIN: f32 = 50.0;

    /// Frame rate the native demo pretends to run at
    pub const TICKS_PER_SECOND: u32 = 60;
}
