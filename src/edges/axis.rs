//! Discrete gradients along one image axis and their projections.
//!
//! Matches the usual array-library convention: second-order central
//! differences `(f[i+1] - f[i-1]) / 2` in the interior and first-order
//! one-sided differences at both borders. An axis of length 1 has zero
//! gradient.
use crate::image::{ImageF32, ImageView, ImageViewMut};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Along `x` (across columns).
    Horizontal,
    /// Along `y` (across rows).
    Vertical,
}

/// Per-pixel derivative of `img` along `axis`.
pub fn axis_gradient(img: &ImageF32, axis: Axis) -> ImageF32 {
    let mut out = ImageF32::new(img.w, img.h);
    match axis {
        Axis::Horizontal => {
            for y in 0..img.h {
                let src = img.row(y);
                diff_into(src.len(), |i| src[i], out.row_mut(y));
            }
        }
        Axis::Vertical => {
            let mut column = vec![0.0f32; img.h];
            let mut grad = vec![0.0f32; img.h];
            for x in 0..img.w {
                for (y, v) in column.iter_mut().enumerate() {
                    *v = img.get(x, y);
                }
                diff_into(column.len(), |i| column[i], &mut grad);
                for (y, &g) in grad.iter().enumerate() {
                    out.set(x, y, g);
                }
            }
        }
    }
    out
}

fn diff_into(n: usize, f: impl Fn(usize) -> f32, out: &mut [f32]) {
    match n {
        0 => {}
        1 => out[0] = 0.0,
        _ => {
            out[0] = f(1) - f(0);
            out[n - 1] = f(n - 1) - f(n - 2);
            for i in 1..n - 1 {
                out[i] = (f(i + 1) - f(i - 1)) * 0.5;
            }
        }
    }
}

/// Sum of `img` over `axis`, in f64: `Vertical` collapses rows into one value
/// per column, `Horizontal` collapses columns into one value per row.
pub fn project(img: &ImageF32, collapse: Axis) -> Vec<f64> {
    match collapse {
        Axis::Horizontal => img
            .rows()
            .map(|row| row.iter().map(|&v| v as f64).sum())
            .collect(),
        Axis::Vertical => {
            let mut acc = vec![0.0f64; img.w];
            for row in img.rows() {
                for (a, &v) in acc.iter_mut().zip(row) {
                    *a += v as f64;
                }
            }
            acc
        }
    }
}

/// Index of the first maximum; `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimum; `None` for an empty slice.
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, b)| v < b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_and_one_sided_differences() {
        let img = ImageF32::from_rows(vec![vec![1.0, 2.0, 4.0, 7.0]]).unwrap();
        let g = axis_gradient(&img, Axis::Horizontal);
        assert_eq!(g.row(0), &[1.0, 1.5, 2.5, 3.0]);
        let v = axis_gradient(&img, Axis::Vertical);
        assert!(v.data.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn ties_resolve_to_first_index() {
        let values = [0.0, 6.0, 6.0, -6.0, -6.0];
        assert_eq!(argmax(&values), Some(1));
        assert_eq!(argmin(&values), Some(3));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn projections_collapse_the_requested_axis() {
        let img = ImageF32::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(project(&img, Axis::Horizontal), vec![3.0, 7.0]);
        assert_eq!(project(&img, Axis::Vertical), vec![4.0, 6.0]);
    }
}
