//! Canny-style binary edge map with median-adaptive thresholds.
//!
//! Pipeline: gradients → non-maximum suppression → double threshold →
//! hysteresis (weak pixels survive only when 8-connected to a strong one).
//!
//! Thresholds are derived from the median sample value of the analysed window,
//! `lower = (1 − σ)·|m|` and `upper = (1 + σ)·|m|`. Thermal frames are
//! dominated by a near-uniform background, so the median tracks the ambient
//! temperature and the thresholds follow the temperature scale of the frame.
use super::grad::{image_gradients, GradientKernel};
use super::nms::suppress_non_maxima;
use crate::image::{ImageF32, ImageView};
use crate::mask::Mask;
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CannyThresholds {
    pub lower: f32,
    pub upper: f32,
}

impl CannyThresholds {
    pub fn from_median(median: f32, sigma: f32) -> Self {
        let m = median.abs();
        Self {
            lower: ((1.0 - sigma) * m).max(0.0),
            upper: (1.0 + sigma) * m,
        }
    }
}

/// Binary edge map of `img`.
pub fn canny(img: &ImageF32, thresholds: CannyThresholds, kernel: GradientKernel) -> Mask {
    let grad = image_gradients(img, kernel);
    let thin = suppress_non_maxima(&grad);
    let w = img.w;
    let h = img.h;
    let mut edges = Mask::new(w, h);
    if w == 0 || h == 0 {
        return edges;
    }

    let mut stack = Vec::new();
    for y in 0..h {
        for (x, &m) in thin.row(y).iter().enumerate() {
            if m >= thresholds.upper && m > 0.0 && !edges.get(x, y) {
                edges.set(x, y, true);
                stack.push((x, y));
                grow(&thin, &mut edges, &mut stack, thresholds.lower);
            }
        }
    }

    debug!(
        "canny: {}x{} lower={:.3} upper={:.3} edge_pixels={}",
        w,
        h,
        thresholds.lower,
        thresholds.upper,
        edges.count()
    );
    edges
}

fn grow(thin: &ImageF32, edges: &mut Mask, stack: &mut Vec<(usize, usize)>, lower: f32) {
    while let Some((x, y)) = stack.pop() {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= thin.w as isize || yn >= thin.h as isize {
                    continue;
                }
                let (xn, yn) = (xn as usize, yn as usize);
                if edges.get(xn, yn) {
                    continue;
                }
                let m = thin.get(xn, yn);
                if m > 0.0 && m >= lower {
                    edges.set(xn, yn, true);
                    stack.push((xn, yn));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_block(w: usize, h: usize, x0: usize, x1: usize, y0: usize, y1: usize) -> ImageF32 {
        let mut img = ImageF32::filled(w, h, 20.0);
        img.fill_rect(x0, x1, y0, y1, 40.0);
        img
    }

    #[test]
    fn step_edges_are_one_pixel_wide() {
        let img = hot_block(40, 30, 10, 30, 8, 20);
        let t = CannyThresholds::from_median(img.median().unwrap(), 0.33);
        let edges = canny(&img, t, GradientKernel::Sobel);
        // Leading edges land on the last background pixel, trailing ones on the
        // last hot pixel.
        assert!(edges.get(9, 14));
        assert!(!edges.get(10, 14));
        assert!(edges.get(29, 14));
        assert!(!edges.get(30, 14));
        assert!(edges.get(20, 7));
        assert!(edges.get(20, 19));
        assert!(!edges.get(20, 14));
    }

    #[test]
    fn flat_image_has_no_edges() {
        let img = ImageF32::filled(16, 16, 25.0);
        let t = CannyThresholds::from_median(25.0, 0.33);
        assert_eq!(canny(&img, t, GradientKernel::Sobel).count(), 0);
    }

    #[test]
    fn thresholds_follow_median_magnitude() {
        let t = CannyThresholds::from_median(-30.0, 0.5);
        assert_eq!(t.lower, 15.0);
        assert_eq!(t.upper, 45.0);
    }
}
