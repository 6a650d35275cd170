//! Casts the fan of rays that feeds the projector.

use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::{
    field::DistanceField,
    marcher::{Marcher, RayResult},
    player::Pose,
};

/// Angle of ray `index`; the fan opens at `heading - fov / 2`.
#[inline]
pub fn ray_angle(heading: f32, fov: f32, ray_count: usize, index: usize) -> f32 {
    let step = fov / ray_count as f32;
    heading - 0.5 * fov + index as f32 * step
}

/// Marches `ray_count` rays left to right across `fov`.
///
/// Results are indexed by ray number, never keyed by angle.
pub fn cast_fan(
    field: &DistanceField,
    marcher: &Marcher,
    pose: Pose,
    fov: f32,
    ray_count: usize,
) -> Vec<RayResult> {
    (0..ray_count)
        .map(|i| {
            let angle = ray_angle(pose.heading, fov, ray_count, i);
            marcher.march(field, pose.position, angle)
        })
        .collect()
}

/// Same fan as [`cast_fan`], rays marched on the rayon pool.
/// Each ray writes only its own slot, so order survives any completion order.
pub fn cast_fan_par(
    field: &DistanceField,
    marcher: &Marcher,
    pose: Pose,
    fov: f32,
    ray_count: usize,
) -> Vec<RayResult> {
    let mut rays = vec![RayResult::default(); ray_count];
    rays.par_iter_mut().enumerate().for_each(|(i, slot)| {
        let angle = ray_angle(pose.heading, fov, ray_count, i);
        *slot = marcher.march(field, pose.position, angle);
    });
    rays
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::maze::Maze;

    fn setup() -> (DistanceField, Marcher, Pose) {
        let maze = Maze::default_layout().unwrap();
        let field = DistanceField::from_maze(&maze, 50.0);
        let pose = Pose {
            position: [75.0, 75.0],
            heading: FRAC_PI_2,
        };
        (field, Marcher::new(1.0, 500.0), pose)
    }

    #[test]
    fn angles_span_the_fov_in_index_order() {
        let (field, marcher, pose) = setup();
        let rays = cast_fan(&field, &marcher, pose, FRAC_PI_2, 8);
        assert_eq!(rays.len(), 8);
        assert!((rays[0].angle - (FRAC_PI_2 - FRAC_PI_2 / 2.0)).abs() < 1e-5);
        for pair in rays.windows(2) {
            assert!(pair[0].angle < pair[1].angle);
        }
        // the last ray stops one step short of the right edge
        let last = FRAC_PI_2 + FRAC_PI_2 / 2.0 - FRAC_PI_2 / 8.0;
        assert!((rays[7].angle - last).abs() < 1e-5);
    }

    #[test]
    fn zero_rays_is_an_empty_fan() {
        let (field, marcher, pose) = setup();
        assert!(cast_fan(&field, &marcher, pose, FRAC_PI_2, 0).is_empty());
        assert!(cast_fan_par(&field, &marcher, pose, FRAC_PI_2, 0).is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let (field, marcher, pose) = setup();
        let seq = cast_fan(&field, &marcher, pose, FRAC_PI_2, 257);
        let par = cast_fan_par(&field, &marcher, pose, FRAC_PI_2, 257);
        assert_eq!(seq, par);
    }

    #[test]
    fn every_ray_in_a_closed_maze_surfaces() {
        let (field, marcher, pose) = setup();
        let rays = cast_fan(&field, &marcher, pose, std::f32::consts::TAU, 64);
        assert!(rays.iter().all(|r| r.surfaced && r.distance <= 500.0));
    }
}
