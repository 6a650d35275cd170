//! Sphere tracing against a [`DistanceField`].

use crate::field::DistanceField;

/// Outcome of marching one ray.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RayResult {
    pub angle: f32, // radians
    pub hit: [f32; 2],
    /// Sum of the step lengths taken, never more than the marching bound.
    pub distance: f32,
    /// False when the ray ran out of distance (or steps) before reaching a wall.
    /// Callers treat such rays as "no wall found".
    pub surfaced: bool,
    /// Field evaluations that advanced the ray.
    pub steps: usize,
}

/// Marching parameters, shared by every ray in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marcher {
    pub epsilon: f32,
    pub max_distance: f32,
}

impl Marcher {
    pub fn new(epsilon: f32, max_distance: f32) -> Self {
        Self {
            epsilon,
            max_distance,
        }
    }

    /// Upper bound on steps: every step but the last advances more than
    /// `epsilon`, so this is never reached on a well-formed field.
    #[inline]
    pub fn max_steps(&self) -> usize {
        // the float-to-int cast saturates, so only the `+ 1` can overflow
        ((self.max_distance / self.epsilon).ceil() as usize).saturating_add(1)
    }

    pub fn march(&self, field: &DistanceField, origin: [f32; 2], angle: f32) -> RayResult {
        let (s, c) = angle.sin_cos();
        let mut p = origin;
        let mut total = 0.0f32;
        let mut surfaced = false;
        let mut steps = 0;

        for _ in 0..self.max_steps() {
            let d = field.distance(p);
            // NaN and anything at or below the surface stop the ray here.
            if !(d > self.epsilon) {
                surfaced = true;
                break;
            }
            let remaining = self.max_distance - total;
            if remaining <= 0.0 {
                break;
            }
            let step = d.min(remaining);
            p[0] += c * step;
            p[1] += s * step;
            total += step;
            steps += 1;
        }

        RayResult {
            angle,
            hit: p,
            distance: total.min(self.max_distance),
            surfaced,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Obstacle;

    fn wall_at(center: [f32; 2]) -> DistanceField {
        DistanceField::new(vec![Obstacle {
            center,
            half_size: 25.0,
        }])
    }

    #[test]
    fn stops_on_facing_wall() {
        let marcher = Marcher::new(1.0, 500.0);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [75.0, 75.0], 0.0);
        assert!(ray.surfaced);
        assert!((99.0..=100.0).contains(&ray.hit[0]), "{:?}", ray);
        assert!((24.0..=25.0 + 1e-3).contains(&ray.distance), "{:?}", ray);
    }

    #[test]
    fn starting_on_surface_takes_no_steps() {
        let marcher = Marcher::new(1.0, 500.0);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [99.5, 75.0], 0.0);
        assert!(ray.surfaced);
        assert_eq!(ray.distance, 0.0);
        assert_eq!(ray.hit, [99.5, 75.0]);
    }

    #[test]
    fn starting_inside_a_wall_does_not_advance() {
        let marcher = Marcher::new(1.0, 500.0);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [125.0, 75.0], 1.0);
        assert_eq!(ray.distance, 0.0);
        assert_eq!(ray.hit, [125.0, 75.0]);
    }

    #[test]
    fn empty_scene_is_capped_at_max_distance() {
        let marcher = Marcher::new(1.0, 500.0);
        let ray = marcher.march(&DistanceField::new(Vec::new()), [0.0, 0.0], 0.3);
        assert!(!ray.surfaced);
        assert_eq!(ray.distance, 500.0);
        let travelled = ray.hit[0].hypot(ray.hit[1]);
        assert!((travelled - 500.0).abs() < 1e-2);
    }

    #[test]
    fn ray_pointing_away_is_capped() {
        let marcher = Marcher::new(1.0, 100.0);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [75.0, 75.0], std::f32::consts::PI);
        assert!(!ray.surfaced);
        assert!(ray.distance <= 100.0);
    }

    #[test]
    fn tiny_epsilon_does_not_overflow_the_step_bound() {
        let marcher = Marcher::new(1e-38, 500.0);
        assert_eq!(marcher.max_steps(), usize::MAX);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [75.0, 75.0], 0.0);
        assert!(ray.surfaced);
        assert!((ray.distance - 25.0).abs() < 1e-3);
    }

    #[test]
    fn steps_stay_within_the_bound() {
        let marcher = Marcher::new(1.0, 500.0);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [75.0, 75.0], 0.0);
        assert_eq!(ray.steps, 1);
        let ray = marcher.march(&DistanceField::new(Vec::new()), [0.0, 0.0], 0.3);
        assert_eq!(ray.steps, 1);
        assert!(ray.steps <= marcher.max_steps());
    }

    #[test]
    fn keeps_the_requested_angle() {
        let marcher = Marcher::new(1.0, 500.0);
        let ray = marcher.march(&wall_at([125.0, 75.0]), [75.0, 75.0], 0.25);
        assert_eq!(ray.angle, 0.25);
    }
}
