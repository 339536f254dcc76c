//! Target silhouette

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Rect};
use crate::error::{PuzzleError, Result};

/// The silhouette the player rebuilds. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    vertices: Vec<Vec2>,
    center: Vec2,
    bounds: Rect,
}

impl Shape {
    /// Build a shape from an ordered outline.
    ///
    /// Fails on fewer than 3 vertices, non-finite coordinates or zero area.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PuzzleError::invalid(format!(
                "shape needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(PuzzleError::invalid("shape has a non-finite vertex"));
        }
        if geometry::polygon_area(&vertices) <= geometry::EPSILON {
            return Err(PuzzleError::invalid("shape has zero area"));
        }
        let center = geometry::centroid(&vertices)
            .ok_or_else(|| PuzzleError::invalid("shape has no vertices"))?;
        let bounds = geometry::bounding_box(&vertices)
            .ok_or_else(|| PuzzleError::invalid("shape has no vertices"))?;
        Ok(Self {
            vertices,
            center,
            bounds,
        })
    }

    /// Axis-aligned rectangle centred on `center`
    pub fn rect(center: Vec2, width: f32, height: f32) -> Result<Self> {
        Self::new(Rect::from_center(center, Vec2::new(width, height)).corners())
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`
    pub fn regular_polygon(center: Vec2, radius: f32, sides: usize) -> Result<Self> {
        let vertices = (0..sides)
            .map(|i| {
                let theta = std::f32::consts::TAU * i as f32 / sides as f32;
                center + Vec2::new(theta.cos(), theta.sin()) * radius
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn area(&self) -> f32 {
        geometry::polygon_area(&self.vertices)
    }
}
