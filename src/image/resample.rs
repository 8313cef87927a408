//! Bilinear resampling.
//!
//! Thermal cameras deliver coarse grids (e.g. 640×480 or smaller CSV exports);
//! the analysis upsamples them by a constant factor before locating the stave
//! so that region boundaries can be placed with sub-sample precision. Sample
//! centres follow the half-pixel convention with edge replication.
use super::{ImageF32, ImageView, ImageViewMut};

/// Resize `src` by `factor`, producing `floor(w·factor) × floor(h·factor)`.
///
/// A non-finite or non-positive factor, or one that collapses the image to
/// zero pixels, returns an empty image.
pub fn resize_bilinear(src: &ImageF32, factor: f32) -> ImageF32 {
    if !factor.is_finite() || factor <= 0.0 || src.is_empty() {
        return ImageF32::new(0, 0);
    }
    let w = (src.w as f32 * factor).floor() as usize;
    let h = (src.h as f32 * factor).floor() as usize;
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    let inv = 1.0 / factor;
    let xs: Vec<(usize, usize, f32)> = (0..w).map(|x| taps(x, inv, src.w)).collect();
    for y in 0..h {
        let (y0, y1, fy) = taps(y, inv, src.h);
        let r0 = src.row(y0);
        let r1 = src.row(y1);
        let dst = out.row_mut(y);
        for (px, &(x0, x1, fx)) in dst.iter_mut().zip(xs.iter()) {
            let top = r0[x0] + (r0[x1] - r0[x0]) * fx;
            let bottom = r1[x0] + (r1[x1] - r1[x0]) * fx;
            *px = top + (bottom - top) * fy;
        }
    }
    out
}

#[inline]
fn taps(dst: usize, inv: f32, len: usize) -> (usize, usize, f32) {
    let s = ((dst as f32 + 0.5) * inv - 0.5).max(0.0);
    let i0 = (s.floor() as usize).min(len - 1);
    let i1 = (i0 + 1).min(len - 1);
    let frac = if i1 == i0 { 0.0 } else { s - i0 as f32 };
    (i0, i1, frac)
}
