//! Puzzle configuration
//!
//! In-memory settings for one puzzle: canvas, silhouette, piece count,
//! decomposition strategy and snap rule. Persisted as JSON when a file path
//! is given.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PuzzleError, Result};
use crate::sim::geometry::Rect;
use crate::sim::{PieceId, Shape, SnapPolicy, Strategy};

/// Silhouette description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Rect { center: Vec2, width: f32, height: f32 },
    Polygon { vertices: Vec<Vec2> },
}

impl ShapeConfig {
    pub fn build(&self) -> Result<Shape> {
        match self {
            ShapeConfig::Rect {
                center,
                width,
                height,
            } => Shape::rect(*center, *width, *height),
            ShapeConfig::Polygon { vertices } => Shape::new(vertices.clone()),
        }
    }
}

/// Everything needed to start a puzzle attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub shape: ShapeConfig,
    /// Requested piece count (Voronoi may emit fewer)
    pub piece_count: usize,
    pub strategy: Strategy,
    pub snap: SnapPolicy,
    /// Pieces placed on their target and locked before play
    pub anchor_ids: Vec<PieceId>,
    /// Minimum distance from a scattered piece position to the canvas edge
    pub scatter_margin: f32,
    /// Pointer tolerance around piece outlines
    pub hit_slop: f32,
    /// Fixed seed; a random one is drawn when absent
    pub seed: Option<u64>,
    /// Start with target outlines visible (easy mode)
    pub show_hints: bool,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            shape: ShapeConfig::Rect {
                center: Vec2::new(CANVAS_WIDTH * 0.5, CANVAS_HEIGHT * 0.5),
                width: SHAPE_SIZE,
                height: SHAPE_SIZE,
            },
            piece_count: DEFAULT_PIECE_COUNT,
            strategy: Strategy::Grid,
            snap: SnapPolicy::default(),
            anchor_ids: Vec::new(),
            scatter_margin: SCATTER_MARGIN,
            hit_slop: 0.0,
            seed: None,
            show_hints: false,
        }
    }
}

impl PuzzleConfig {
    pub fn canvas(&self) -> Rect {
        Rect::from_size(self.canvas_width, self.canvas_height)
    }

    /// Fail fast on anything that would make the puzzle unplayable
    pub fn validate(&self) -> Result<()> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(PuzzleError::invalid(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.piece_count == 0 {
            return Err(PuzzleError::invalid("piece count must be positive"));
        }
        if !(self.scatter_margin >= 0.0)
            || self.scatter_margin * 2.0 > self.canvas_width.min(self.canvas_height)
        {
            return Err(PuzzleError::invalid(format!(
                "scatter margin {} does not fit the canvas",
                self.scatter_margin
            )));
        }
        if !(self.hit_slop >= 0.0) {
            return Err(PuzzleError::invalid("hit slop must not be negative"));
        }
        self.snap.validate()?;
        self.shape.build()?;
        Ok(())
    }

    /// Configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        config.validate()?;
        log::info!("Loaded puzzle config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Puzzle config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PuzzleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas().size(), Vec2::new(1170.0, 2532.0));
    }

    #[test]
    fn test_invalid_configurations() {
        let bad = [
            PuzzleConfig {
                piece_count: 0,
                ..Default::default()
            },
            PuzzleConfig {
                snap: SnapPolicy::absolute(-1.0),
                ..Default::default()
            },
            PuzzleConfig {
                shape: ShapeConfig::Rect {
                    center: Vec2::ZERO,
                    width: 0.0,
                    height: 100.0,
                },
                ..Default::default()
            },
            PuzzleConfig {
                canvas_width: 0.0,
                ..Default::default()
            },
            PuzzleConfig {
                scatter_margin: 700.0,
                ..Default::default()
            },
            PuzzleConfig {
                hit_slop: f32::NAN,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(PuzzleError::InvalidConfiguration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let config = PuzzleConfig::from_json(
            r#"{
                "piece_count": 12,
                "strategy": "voronoi",
                "snap": { "mode": "absolute", "threshold": 10.0 },
                "shape": { "kind": "polygon", "vertices": [[0, 0], [100, 0], [50, 80]] },
                "seed": 7
            }"#,
        )
        .unwrap();
        assert_eq!(config.piece_count, 12);
        assert_eq!(config.strategy, Strategy::Voronoi);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.resolve_seed(), 7);
        assert_eq!(config.canvas_width, CANVAS_WIDTH);
        assert!(config.validate().is_ok());

        let back = PuzzleConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("shard-puzzle-config-{}.json", std::process::id()));
        let config = PuzzleConfig {
            piece_count: 6,
            seed: Some(99),
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = PuzzleConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = PuzzleConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(PuzzleError::Io(_))));
    }
}
