use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source index for every destination row and column.
/// `None` marks the letterbox bars around the scaled image.
pub struct ScaleLut {
    xs: Vec<Option<usize>>,
    ys: Vec<Option<usize>>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }
}

fn axis(dst: usize, src: usize, scale: f32) -> Vec<Option<usize>> {
    let span = (src as f32 * scale).round() as usize;
    let offset = dst.saturating_sub(span) / 2;
    (0..dst)
        .map(|d| {
            if d < offset || d >= offset + span {
                return None;
            }
            let s = ((d - offset) as f32 + 0.5) / scale;
            Some((s as usize).min(src - 1))
        })
        .collect()
}

/// Uniform scale that fits `src` inside `dst`, centred.
pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if dst_w == 0 || dst_h == 0 || src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }
    let scale = (dst_w as f32 / src_w as f32).min(dst_h as f32 / src_h as f32);
    ScaleLut {
        xs: axis(dst_w, src_w, scale),
        ys: axis(dst_h, src_h, scale),
    }
}

/// Parallel nearest-neighbour blit, one destination row per task.
pub fn blit_letterboxed(
    dst: &mut [u32],
    dw: usize,
    src: &[u32],
    sw: usize,
    lut: &ScaleLut,
    bar: u32,
) {
    if dw == 0 || lut.xs.len() != dw {
        dst.fill(bar);
        return;
    }
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(Some(sy)) = lut.ys.get(y) else {
            dst_row.fill(bar);
            return;
        };
        let row = &src[sy * sw..(sy + 1) * sw];
        for (d, sx) in dst_row.iter_mut().zip(&lut.xs) {
            *d = match sx {
                Some(sx) => row[*sx],
                None => bar,
            };
        }
    });
}
