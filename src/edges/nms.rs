//! Non‑maximum suppression on gradient magnitude with direction alignment.
//!
//! Each pixel is compared with its two neighbours along the gradient direction
//! quantised to 0°, 45°, 90° or 135°. The comparison is asymmetric: a pixel must
//! be strictly greater than the neighbour that precedes it in scan order and at
//! least equal to the one that follows. A step edge produces a two-pixel plateau of equal magnitude
//! under a 3×3 kernel; the asymmetric test keeps exactly one pixel of it.
//!
//! The outermost 1‑pixel frame is always suppressed.
use crate::edges::grad::Grad;
use crate::image::{ImageF32, ImageView, ImageViewMut};

const TAN_22_5_DEG: f32 = 0.414_213_57;

/// Returns the magnitude image with every non-maximal pixel set to zero.
pub fn suppress_non_maxima(grad: &Grad) -> ImageF32 {
    let w = grad.gx.w;
    let h = grad.gx.h;
    let mut out = ImageF32::new(w, h);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);
        let out_row = out.row_mut(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag <= 0.0 {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            // (preceding, following) neighbour in scan order
            let (backward, forward) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag_row[x - 1], mag_row[x + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag > backward && mag >= forward {
                out_row[x] = mag;
            }
        }
    }

    out
}
