//! Turns per-ray distances into screen columns.

use crate::marcher::RayResult;

/// Screen rectangle the columns are laid into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One vertical strip of the pseudo-3D view.
///
/// `height` may be zero or negative for far walls and `shade` may leave
/// `0..=255`; both are passed through raw and the renderer decides.
/// Rays that found no wall get a zero-height column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub shade: i32,
}

/// Bar height for a fisheye-corrected distance. Strictly decreasing.
#[inline]
pub fn bar_height(corrected_distance: f32, viewport_height: f32) -> f32 {
    0.5 * viewport_height - corrected_distance
}

/// Greyscale level, 255 at the eye, 0 at `reference`. Not clamped.
#[inline]
pub fn shade(distance: f32, reference: f32) -> i32 {
    let shade_per_unit = 255.0 / reference;
    255 - (distance * shade_per_unit).floor() as i32
}

pub fn project(
    rays: &[RayResult],
    viewport: Viewport,
    heading: f32,
    shade_reference: f32,
) -> Vec<Column> {
    if rays.is_empty() {
        return Vec::new();
    }
    let bar_width = viewport.width / rays.len() as f32;

    rays.iter()
        .enumerate()
        .map(|(i, ray)| {
            // Distance to the view plane rather than to the eye
            let relative = heading - ray.angle;
            let corrected = ray.distance * relative.cos();
            let height = if ray.surfaced {
                bar_height(corrected, viewport.height)
            } else {
                0.0
            };
            Column {
                x: viewport.x + i as f32 * bar_width,
                y: viewport.y + 0.5 * (viewport.height - height),
                width: bar_width,
                height,
                shade: shade(ray.distance, shade_reference),
            }
        })
        .collect()
}
