use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source row and column for every destination pixel.
pub struct ScaleLut {
    xs: Vec<usize>,
    ys: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    /// Whether this table was built for a `dst_w` x `dst_h` target.
    pub fn fits(&self, dst_w: usize, dst_h: usize) -> bool {
        self.xs.len() == dst_w && self.ys.len() == dst_h
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let nearest = |i: usize, dst: usize, src: usize| (i * src / dst).min(src.saturating_sub(1));
    ScaleLut {
        xs: (0..dst_w).map(|x| nearest(x, dst_w, src_w)).collect(),
        ys: (0..dst_h).map(|y| nearest(y, dst_h, src_h)).collect(),
    }
}

/// Parallel nearest-neighbour stretch, keeping the rendered pixels square
/// and sharp. Rows are processed in parallel for cache friendly writes.
pub fn blit_nearest_stretch(dst: &mut [u32], dst_w: usize, src: &[u32], src_w: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dst_w)
        .zip(lut.ys.par_iter())
        .for_each(|(row, &sy)| {
            let src_row = &src[sy * src_w..(sy + 1) * src_w];
            for (pixel, &sx) in row.iter_mut().zip(&lut.xs) {
                *pixel = src_row[sx];
            }
        });
}
