use std::f32::consts::TAU;

use crate::field::DistanceField;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: [f32; 2], // (x, y) in world units
    pub heading: f32,       // radians, 0 = +x, PI/2 = +y (down the map)
}

impl Pose {
    /// Wraps the heading into `[0, TAU)`.
    pub fn normalize_heading(&mut self) {
        self.heading = self.heading.rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if self.heading >= TAU {
            self.heading = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Per-tick displacement along `heading`, floored to whole world units.
///
/// Flooring happens before the direction sign is applied, so forward and
/// backward steps differ by one unit on axes with a fractional component.
#[inline]
pub fn quantized_step(heading: f32, speed: f32) -> [f32; 2] {
    let (s, c) = heading.sin_cos();
    [(c * speed).floor(), (s * speed).floor()]
}

/// Owns the player pose and keeps it out of the walls.
///
/// Collision is tested at a single point; the drawn radius plays no part.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    pose: Pose,
    move_speed: f32,
    safety_margin: f32,
}

impl PlayerController {
    pub fn new(pose: Pose, move_speed: f32, safety_margin: f32) -> Self {
        Self {
            pose,
            move_speed,
            safety_margin,
        }
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Wraps the heading into `[0, TAU)`; position is untouched.
    pub fn normalize_heading(&mut self) {
        self.pose.normalize_heading();
    }

    /// Turns without any validation; the heading may leave `[0, TAU)`.
    pub fn rotate(&mut self, delta: f32) {
        self.pose.heading += delta;
    }

    /// Steps along the heading unless the landing point is within the safety
    /// margin of a wall. Returns whether the move was committed.
    pub fn try_move(&mut self, field: &DistanceField, direction: Direction) -> bool {
        let step = quantized_step(self.pose.heading, self.move_speed);
        let sign = direction.sign();
        let candidate = [
            self.pose.position[0] + sign * step[0],
            self.pose.position[1] + sign * step[1],
        ];

        let clearance = field.distance(candidate);
        if clearance > self.safety_margin {
            self.pose.position = candidate;
            true
        } else {
            log::debug!(
                "move {:?} to ({:.1}, {:.1}) blocked, clearance {:.2}",
                direction,
                candidate[0],
                candidate[1],
                clearance
            );
            false
        }
    }
}
