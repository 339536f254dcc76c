//! Built-in stage catalog
//!
//! Each stage is a named preset that expands into a full `PuzzleConfig`.

use glam::Vec2;

use crate::consts::*;
use crate::settings::{PuzzleConfig, ShapeConfig};
use crate::sim::{SnapPolicy, Strategy};

/// How a stage is played
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageKind {
    /// Rebuild the square silhouette; pieces lock near their own target
    Silhouette {
        piece_count: usize,
        strategy: Strategy,
        threshold: f32,
    },
    /// Two interlocking halves; the left one is fixed
    AdjacencyPair { snap_x: f32, snap_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageEntry {
    pub id: u32,
    pub name: &'static str,
    pub kind: StageKind,
}

pub const DEFAULT_STAGE_ID: u32 = 1;

pub const STAGES: &[StageEntry] = &[
    StageEntry {
        id: 1,
        name: "Stage 1",
        kind: StageKind::Silhouette {
            piece_count: DEFAULT_PIECE_COUNT,
            strategy: Strategy::Grid,
            threshold: DEFAULT_SNAP_THRESHOLD,
        },
    },
    StageEntry {
        id: 2,
        name: "Stage 2",
        kind: StageKind::Silhouette {
            piece_count: 12,
            strategy: Strategy::Voronoi,
            threshold: 15.0,
        },
    },
    StageEntry {
        id: 3,
        name: "Stage 3",
        kind: StageKind::AdjacencyPair {
            snap_x: ADJACENCY_SNAP_X,
            snap_y: ADJACENCY_SNAP_Y,
        },
    },
];

impl StageEntry {
    /// Puzzle configuration for this stage (random seed)
    pub fn config(&self) -> PuzzleConfig {
        let center = Vec2::new(CANVAS_WIDTH * 0.5, CANVAS_HEIGHT * 0.5);
        match self.kind {
            StageKind::Silhouette {
                piece_count,
                strategy,
                threshold,
            } => PuzzleConfig {
                piece_count,
                strategy,
                snap: SnapPolicy::absolute(threshold),
                ..PuzzleConfig::default()
            },
            StageKind::AdjacencyPair { snap_x, snap_y } => PuzzleConfig {
                // Two square halves side by side; piece 1 (left) is the anchor
                shape: ShapeConfig::Rect {
                    center,
                    width: SHAPE_SIZE,
                    height: SHAPE_SIZE * 0.5,
                },
                piece_count: 2,
                strategy: Strategy::Grid,
                snap: SnapPolicy::adjacency(snap_x, snap_y),
                anchor_ids: vec![1],
                ..PuzzleConfig::default()
            },
        }
    }
}

pub fn stage_by_id(id: u32) -> Option<&'static StageEntry> {
    STAGES.iter().find(|stage| stage.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AutoSolver, PuzzleController, PuzzleEvent, PuzzleState, Renderer};

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn render(&mut self, _state: &PuzzleState) {}
    }

    #[test]
    fn test_lookup() {
        assert_eq!(stage_by_id(2).map(|s| s.name), Some("Stage 2"));
        assert!(stage_by_id(9).is_none());
        assert!(stage_by_id(DEFAULT_STAGE_ID).is_some());
    }

    #[test]
    fn test_every_stage_config_is_valid() {
        for stage in STAGES {
            let config = PuzzleConfig {
                seed: Some(stage.id as u64),
                ..stage.config()
            };
            assert!(config.validate().is_ok(), "{} invalid", stage.name);
            assert!(PuzzleState::new(&config, 5).is_ok());
        }
    }

    #[test]
    fn test_every_stage_is_solvable() {
        for stage in STAGES {
            let config = PuzzleConfig {
                seed: Some(11),
                ..stage.config()
            };
            let mut controller = PuzzleController::new(config, Vec::new()).unwrap();
            let mut solver = AutoSolver::new();
            for _ in 0..=controller.state().len() {
                controller.frame(&mut solver, &mut NullRenderer);
            }
            assert!(controller.is_complete(), "{} not solved", stage.name);
            assert!(controller.sink().contains(&PuzzleEvent::PuzzleComplete));
        }
    }

    #[test]
    fn test_pair_stage_has_fixed_left_half() {
        let config = stage_by_id(3).unwrap().config();
        let state = PuzzleState::new(&config, 3).unwrap();
        assert_eq!(state.len(), 2);
        let anchor = state.piece(1).unwrap();
        assert!(anchor.is_snapped());
        assert!(!state.piece(2).unwrap().is_snapped());
        assert!(anchor.target().x < state.piece(2).unwrap().target().x);
    }
}
