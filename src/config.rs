use std::f32::consts::PI;

use crate::error::ConfigError;

pub const DEFAULT_CELL_SIZE: f32 = 50.0; // world units per grid cell
pub const DEFAULT_RAY_COUNT: usize = 1000;

/// Tunables for the whole core. Nothing downstream hard-codes these.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cell_size: f32,
    pub fov: f32, // radians
    pub ray_count: usize,
    pub move_speed: f32,   // world units per tick
    pub rotate_speed: f32, // radians per tick
    pub player_radius: f32,
    pub max_distance: f32,
    /// Marching stops once the field drops to this value, and the player may
    /// only step onto points strictly farther than it from any wall.
    pub surface_epsilon: f32,
    /// Distance at which the shade reaches zero.
    pub shade_reference: f32,
    pub start_cell: (usize, usize), // (column, row)
    pub start_heading: f32,
    pub parallel_rays: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_cell_size(DEFAULT_CELL_SIZE)
    }
}

impl Config {
    /// Defaults scaled to `cell_size`; the marching bound is ten cells.
    pub fn for_cell_size(cell_size: f32) -> Self {
        Self {
            cell_size,
            fov: PI / 2.0,
            ray_count: DEFAULT_RAY_COUNT,
            move_speed: 3.0,
            rotate_speed: PI / 30.0,
            player_radius: 10.0,
            max_distance: cell_size * 10.0,
            surface_epsilon: 1.0,
            shade_reference: 400.0,
            start_cell: (1, 1),
            start_heading: PI / 2.0,
            parallel_rays: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("cell_size", self.cell_size)?;
        positive("max_distance", self.max_distance)?;
        positive("surface_epsilon", self.surface_epsilon)?;
        positive("shade_reference", self.shade_reference)?;
        positive("move_speed", self.move_speed)?;
        non_negative("fov", self.fov)?;
        non_negative("rotate_speed", self.rotate_speed)?;
        non_negative("player_radius", self.player_radius)?;
        if !self.start_heading.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "start_heading",
                value: self.start_heading,
            });
        }
        if self.ray_count == 0 {
            return Err(ConfigError::NoRays);
        }
        // The marcher's step bound is max_distance / surface_epsilon.
        let step_bound = self.max_distance / self.surface_epsilon;
        if !step_bound.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "max_distance / surface_epsilon",
                value: step_bound,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
