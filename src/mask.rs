//! Boolean pixel raster shared by edge maps, composite regions and overlays.
//!
//! Drawing primitives follow raster-graphics conventions: filled rectangles
//! include both corner pixels and accept corners in any order, arcs are bands
//! of a given thickness around a circle of a given radius. Everything is
//! clipped to the raster.
use nalgebra::{Point2, Vector2};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<bool>,
}

/// Inclusive pixel bounds `[x_min, x_max] × [y_min, y_max]` of the set pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelBounds {
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl Mask {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        self.data[y * self.w + x] = v;
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|v| **v).count()
    }

    /// Pixel coordinates `(x, y)` of every set pixel in row-major order.
    pub fn points(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(move |(i, _)| (i % self.w, i / self.w))
    }

    pub fn bounds(&self) -> Option<PixelBounds> {
        let mut it = self.points();
        let (x0, y0) = it.next()?;
        let mut b = PixelBounds {
            x_min: x0,
            x_max: x0,
            y_min: y0,
            y_max: y0,
        };
        for (x, y) in it {
            b.x_min = b.x_min.min(x);
            b.x_max = b.x_max.max(x);
            b.y_min = b.y_min.min(y);
            b.y_max = b.y_max.max(y);
        }
        Some(b)
    }

    /// Logical OR of `other` into `self`. Masks of different sizes are ignored
    /// outside the overlapping area.
    pub fn union_with(&mut self, other: &Mask) {
        for y in 0..self.h.min(other.h) {
            for x in 0..self.w.min(other.w) {
                if other.get(x, y) {
                    self.set(x, y, true);
                }
            }
        }
    }

    /// Fill the rectangle spanned by the two corners, both included.
    pub fn fill_rect(&mut self, a: (i64, i64), b: (i64, i64)) {
        let Some((x0, x1)) = clip_span(a.0.min(b.0), a.0.max(b.0), self.w) else {
            return;
        };
        let Some((y0, y1)) = clip_span(a.1.min(b.1), a.1.max(b.1), self.h) else {
            return;
        };
        for y in y0..=y1 {
            let start = y * self.w;
            for v in &mut self.data[start + x0..=start + x1] {
                *v = true;
            }
        }
    }

    /// Draw the outline of the rectangle spanned by two corners with the given
    /// line thickness (grown inwards and outwards symmetrically).
    pub fn stroke_rect(&mut self, a: (i64, i64), b: (i64, i64), thickness: i64) {
        let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
        let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
        let t = thickness.max(1);
        let lo = (t - 1) / 2;
        let hi = t / 2;
        self.fill_rect((x0 - lo, y0 - lo), (x1 + hi, y0 + hi));
        self.fill_rect((x0 - lo, y1 - lo), (x1 + hi, y1 + hi));
        self.fill_rect((x0 - lo, y0 - lo), (x0 + hi, y1 + hi));
        self.fill_rect((x1 - lo, y0 - lo), (x1 + hi, y1 + hi));
    }

    /// Set every pixel whose centre lies in the circular band
    /// `radius ± thickness/2` around `centre` and whose polar angle lies in
    /// `[start_deg, stop_deg]`.
    ///
    /// Angles are measured in image coordinates: 0° points to +x and 90° to +y
    /// (downwards), so they run clockwise on screen.
    pub fn fill_arc_band(
        &mut self,
        centre: Point2<f64>,
        radius: f64,
        thickness: f64,
        start_deg: f64,
        stop_deg: f64,
    ) {
        let half = 0.5 * thickness.max(1.0);
        let r_in = (radius - half).max(0.0);
        let r_out = radius + half;
        let reach = r_out.ceil() as i64;
        let cx = centre.x.round() as i64;
        let cy = centre.y.round() as i64;
        let Some((x0, x1)) = clip_span(cx - reach, cx + reach, self.w) else {
            return;
        };
        let Some((y0, y1)) = clip_span(cy - reach, cy + reach, self.h) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vector2::new(x as f64, y as f64) - centre.coords;
                let r = d.norm();
                if r < r_in || r > r_out {
                    continue;
                }
                if angle_in_range(d.y.atan2(d.x).to_degrees(), start_deg, stop_deg) {
                    self.set(x, y, true);
                }
            }
        }
    }
}

fn clip_span(lo: i64, hi: i64, len: usize) -> Option<(usize, usize)> {
    if len == 0 || hi < 0 || lo >= len as i64 {
        return None;
    }
    Some((lo.max(0) as usize, hi.min(len as i64 - 1) as usize))
}

fn angle_in_range(angle_deg: f64, start_deg: f64, stop_deg: f64) -> bool {
    let a = angle_deg.rem_euclid(360.0);
    let s = start_deg.rem_euclid(360.0);
    let sweep = (stop_deg - start_deg).clamp(0.0, 360.0);
    if sweep >= 360.0 {
        return true;
    }
    let rel = (a - s).rem_euclid(360.0);
    rel <= sweep + 1e-9
}
