//! Signed distance from any world point to the maze walls.

use crate::maze::Maze;

/// Axis-aligned square footprint of one wall cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: [f32; 2],
    pub half_size: f32,
}

/// Exact Euclidean signed distance from `p` to a square; negative inside.
#[inline]
pub fn box_sdf(p: [f32; 2], center: [f32; 2], half_size: f32) -> f32 {
    let dx = (p[0] - center[0]).abs() - half_size;
    let dy = (p[1] - center[1]).abs() - half_size;
    let outside = dx.max(0.0).hypot(dy.max(0.0));
    let inside = dx.max(dy).min(0.0);
    outside + inside
}

/// Union of every wall footprint. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceField {
    obstacles: Vec<Obstacle>,
}

impl DistanceField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// One square per wall cell, centred in the cell.
    pub fn from_maze(maze: &Maze, cell_size: f32) -> Self {
        let half_size = cell_size * 0.5;
        let obstacles = maze
            .walls()
            .map(|(x, y)| Obstacle {
                center: [
                    x as f32 * cell_size + half_size,
                    y as f32 * cell_size + half_size,
                ],
                half_size,
            })
            .collect();
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Minimum signed distance over all obstacles.
    ///
    /// Unbounded: an empty field reports `f32::INFINITY`, and callers clamp.
    pub fn distance(&self, p: [f32; 2]) -> f32 {
        self.obstacles
            .iter()
            .map(|o| box_sdf(p, o.center, o.half_size))
            .fold(f32::INFINITY, f32::min)
    }
}
