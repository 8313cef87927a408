//! Owned single-channel f32 image in row-major layout (stride == width).
//!
//! Holds one temperature sample per pixel. Provides row access, cropping and
//! the handful of statistics the locators need (mean, median, extrema).
//! Sums are accumulated in `f64` so that averages over uniform areas are exact.
use super::traits::{ImageView, ImageViewMut};

#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a buffer of size `w × h` with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Fails when `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Result<Self, String> {
        if data.len() != w * h {
            return Err(format!(
                "buffer of {} samples does not match {w}x{h}",
                data.len()
            ));
        }
        Ok(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    /// Build an image from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, String> {
        let h = rows.len();
        let w = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(w * h);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != w {
                return Err(format!(
                    "row {y} has {} columns, expected {w}",
                    row.len()
                ));
            }
            data.extend(row);
        }
        Self::from_vec(w, h, data)
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Fill the half-open rectangle `[x0, x1) × [y0, y1)` (clamped) with `value`.
    pub fn fill_rect(&mut self, x0: usize, x1: usize, y0: usize, y1: usize, value: f32) {
        let x1 = x1.min(self.w);
        let y1 = y1.min(self.h);
        for y in y0.min(y1)..y1 {
            let row = self.row_mut(y);
            for px in &mut row[x0.min(x1)..x1] {
                *px = value;
            }
        }
    }

    /// Copy out the half-open window `[x0, x1) × [y0, y1)`.
    ///
    /// Bounds are clamped to the image like slice indexing in array libraries,
    /// so an out-of-range or inverted window yields an empty image rather than
    /// a panic.
    pub fn crop(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> ImageF32 {
        let x1 = x1.min(self.w);
        let y1 = y1.min(self.h);
        let x0 = x0.min(x1);
        let y0 = y0.min(y1);
        let w = x1 - x0;
        let h = y1 - y0;
        let mut data = Vec::with_capacity(w * h);
        for y in y0..y1 {
            data.extend_from_slice(&self.row(y)[x0..x1]);
        }
        ImageF32 {
            w,
            h,
            stride: w,
            data,
        }
    }

    /// Sum of all samples, accumulated in f64.
    pub fn sum(&self) -> f64 {
        self.rows()
            .map(|row| row.iter().map(|&v| v as f64).sum::<f64>())
            .sum()
    }

    /// Arithmetic mean, `None` for an empty image.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / (self.w * self.h) as f64)
    }

    /// Median of all samples (mean of the two central values for even counts).
    pub fn median(&self) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let mut values: Vec<f32> = self.rows().flat_map(|r| r.iter().copied()).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let n = values.len();
        Some(if n % 2 == 1 {
            values[n / 2]
        } else {
            0.5 * (values[n / 2 - 1] + values[n / 2])
        })
    }

    /// `(min, max)` over all samples.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for row in self.rows() {
            for &v in row {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        Some((lo, hi))
    }
}

impl ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

impl ImageViewMut for ImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }
}
