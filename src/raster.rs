//! Software rasterizer for [`DrawCommand`] lists.
//!
//! Pixels are `0x00RRGGBB`, the layout softbuffer expects. Everything is
//! clipped to the target buffer.

use crate::frame::{DrawCommand, Rgb};

#[inline]
pub fn pack_rgb(Rgb(r, g, b): Rgb) -> u32 {
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// Column shades arrive raw from the projector; saturate them here.
#[inline]
pub fn grey(shade: i32) -> u32 {
    let v = shade.clamp(0, 255) as u8;
    pack_rgb(Rgb(v, v, v))
}

pub struct Target<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Target<'a> {
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert_eq!(buf.len(), width * height);
        Self { buf, width, height }
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.buf[y as usize * self.width + x as usize] = color;
    }

    /// Fills pixels whose centres lie inside the rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let x0 = ((x - 0.5).ceil() as i32).max(0);
        let y0 = ((y - 0.5).ceil() as i32).max(0);
        let x1 = ((x + w - 0.5).ceil() as i32).min(self.width as i32);
        let y1 = ((y + h - 0.5).ceil() as i32).min(self.height as i32);
        for py in y0..y1 {
            let row = py as usize * self.width;
            for px in x0..x1 {
                self.buf[row + px as usize] = color;
            }
        }
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let (x0, y0) = (x.round() as i32, y.round() as i32);
        let (x1, y1) = ((x + w).round() as i32 - 1, (y + h).round() as i32 - 1);
        self.line(x0, y0, x1, y0, color);
        self.line(x1, y0, x1, y1, color);
        self.line(x1, y1, x0, y1, color);
        self.line(x0, y1, x0, y0, color);
    }

    /// Bresenham, endpoints inclusive.
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn disc(&mut self, center: [f32; 2], radius: f32, color: u32) {
        if !(radius > 0.0) {
            return;
        }
        let r2 = radius * radius;
        let x0 = (center[0] - radius).floor() as i32;
        let x1 = (center[0] + radius).ceil() as i32;
        let y0 = (center[1] - radius).floor() as i32;
        let y1 = (center[1] + radius).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - center[0];
                let dy = py as f32 + 0.5 - center[1];
                if dx * dx + dy * dy <= r2 {
                    self.put(px, py, color);
                }
            }
        }
    }

    fn text(&mut self, origin: [f32; 2], size: f32, text: &str, color: u32) {
        let scale = ((size / GLYPH_H as f32).floor() as i32).max(1);
        let (ox, oy) = (origin[0].round() as i32, origin[1].round() as i32);
        for (i, ch) in text.chars().enumerate() {
            let Some(rows) = glyph(ch) else { continue };
            let gx = ox + i as i32 * (GLYPH_W as i32 + 1) * scale;
            for (ry, &bits) in rows.iter().enumerate() {
                for rx in 0..GLYPH_W {
                    if bits & (1u8 << (GLYPH_W - 1 - rx)) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.put(
                                gx + rx as i32 * scale + sx,
                                oy + ry as i32 * scale + sy,
                                color,
                            );
                        }
                    }
                }
            }
        }
    }
}

pub fn draw(target: &mut Target<'_>, commands: &[DrawCommand]) {
    for cmd in commands {
        match cmd {
            DrawCommand::Clear(color) => target.buf.fill(pack_rgb(*color)),
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => target.fill_rect(*x, *y, *width, *height, pack_rgb(*color)),
            DrawCommand::StrokeRect {
                x,
                y,
                width,
                height,
                color,
            } => target.stroke_rect(*x, *y, *width, *height, pack_rgb(*color)),
            DrawCommand::Line { from, to, color } => target.line(
                from[0].round() as i32,
                from[1].round() as i32,
                to[0].round() as i32,
                to[1].round() as i32,
                pack_rgb(*color),
            ),
            DrawCommand::Disc {
                center,
                radius,
                color,
            } => target.disc(*center, *radius, pack_rgb(*color)),
            // Non-positive heights mean the wall is out of sight: draw nothing
            DrawCommand::Column(col) => {
                target.fill_rect(col.x, col.y, col.width, col.height, grey(col.shade))
            }
            DrawCommand::Text {
                origin,
                size,
                text,
                color,
            } => target.text(*origin, *size, text, pack_rgb(*color)),
        }
    }
}

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;

// 5x7, MSB is the leftmost pixel. Only what the HUD prints.
fn glyph(ch: char) -> Option<[u8; GLYPH_H]> {
    Some(match ch {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        'F' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10],
        'P' => [0x1e, 0x11, 0x11, 0x1e, 0x10, 0x10, 0x10],
        'S' => [0x0f, 0x10, 0x10, 0x0e, 0x01, 0x01, 0x1e],
        ':' => [0x00, 0x0c, 0x0c, 0x00, 0x0c, 0x0c, 0x00],
        _ => return None,
    })
}
