use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::surface::Surface;

/// Precomputed mapping from dest pixels to the nearest source pixel
pub struct ScaleLut {
    xs: Vec<usize>,
    ys: Vec<usize>,
    src: (usize, usize),
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
            src: (0, 0),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.xs.len(), self.ys.len())
    }

    pub fn src_size(&self) -> (usize, usize) {
        self.src
    }

    /// True when the table was built for exactly these destination and source sizes.
    pub fn fits(&self, dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> bool {
        self.dst_size() == (dst_w, dst_h) && self.src == (src_w, src_h)
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let sx = src_w as f32 / dst_w.max(1) as f32;
    let sy = src_h as f32 / dst_h.max(1) as f32;
    let last_x = src_w.saturating_sub(1);
    let last_y = src_h.saturating_sub(1);

    let xs = (0..dst_w)
        .map(|x| ((x as f32 * sx) as usize).min(last_x))
        .collect();
    let ys = (0..dst_h)
        .map(|y| ((y as f32 * sy) as usize).min(last_y))
        .collect();

    ScaleLut {
        xs,
        ys,
        src: (src_w, src_h),
    }
}

/// Unpacks every pixel of `surface` into one palette index per byte, row-major.
pub fn unpack_indices(surface: &Surface, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(surface.width() as usize * surface.height() as usize);
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            out.push(surface.get_pixel(x, y));
        }
    }
}

/// Parallel nearest-neighbour stretch of palette indices into 0RGB pixels.
/// Rows are processed in parallel for cache friendly writes
pub fn blit_indexed_stretch(
    dst: &mut [u32],
    dw: usize,
    src: &[u8],
    sw: usize,
    table: &[u32; 16],
    lut: &ScaleLut,
) {
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let Some(&sy) = lut.ys.get(y) else {
            return;
        };
        let row = &src[sy * sw..(sy + 1) * sw];
        for (px, &sx) in dst_row.iter_mut().zip(&lut.xs) {
            *px = table[(row[sx] & 0x0F) as usize];
        }
    });
}
