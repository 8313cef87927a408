use super::{BBox, LocateError, StaveLocator, Window};
use crate::edges::{canny, CannyThresholds, GradientKernel};
use crate::image::ImageF32;
use crate::mask::Mask;
use crate::segments::{hough_segments, HoughOptions};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Tuning of [`HoughLocator`]. Pixel quantities refer to the analysed image;
/// see [`HoughLocatorParams::scaled`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughLocatorParams {
    /// Canny thresholds are `(1 ∓ sigma) · median` of the window.
    pub canny_sigma: f32,
    pub gradient_kernel: GradientKernel,
    pub long_lines: HoughOptions,
    pub short_lines: HoughOptions,
    /// Long-line candidates steeper than this are ignored.
    pub max_horizontal_slope: f32,
    /// Short-line candidates must be steeper than this.
    pub min_vertical_slope: f32,
    /// Approximate window-relative row of the stave centre; window centre when unset.
    pub expected_y: Option<f64>,
    /// Largest accepted distance of a long-edge candidate from `expected_y`.
    pub max_y_spread_px: f64,
    /// Expected stave length in pixels.
    pub expected_length_px: f64,
    /// Accepted relative deviation from `expected_length_px`.
    pub length_tolerance: f64,
    /// Reference temperature for the end-search contrast score; window median when unset.
    pub baseline_temperature: Option<f64>,
}

impl Default for HoughLocatorParams {
    fn default() -> Self {
        Self {
            canny_sigma: 0.33,
            gradient_kernel: GradientKernel::Sobel,
            long_lines: HoughOptions::long_lines(),
            short_lines: HoughOptions::short_lines(),
            max_horizontal_slope: 0.1,
            min_vertical_slope: 1.0,
            expected_y: None,
            max_y_spread_px: 50.0,
            expected_length_px: 548.2,
            length_tolerance: 0.05,
            baseline_temperature: None,
        }
    }
}

impl HoughLocatorParams {
    pub fn scaled(mut self, factor: f64) -> Self {
        let f = factor as f32;
        self.long_lines = self.long_lines.with_scale(f);
        self.short_lines = self.short_lines.with_scale(f);
        self.expected_y = self.expected_y.map(|y| y * factor);
        self.max_y_spread_px *= factor;
        self.expected_length_px *= factor;
        self
    }
}

/// Edge-map and line-segment based stave finder, robust to noise and to
/// partially visible ends.
#[derive(Clone, Debug, Default)]
pub struct HoughLocator {
    pub params: HoughLocatorParams,
}

impl HoughLocator {
    pub fn new(params: HoughLocatorParams) -> Self {
        Self { params }
    }

    /// Long edges: cluster near-horizontal line midpoints around the expected
    /// row, dropping the furthest outlier until the cluster is tight.
    fn long_edges(&self, edges: &Mask, window: &Window) -> Result<(f64, f64), LocateError> {
        let p = &self.params;
        let ys: Vec<f64> = hough_segments(edges, &p.long_lines)
            .iter()
            .filter(|s| s.slope() <= p.max_horizontal_slope)
            .map(|s| s.midpoint()[1] as f64)
            .collect();
        debug!("hough locator: {} horizontal candidates {:?}", ys.len(), ys);
        if ys.is_empty() {
            return Err(LocateError::NoLinesFound {
                kind: "long horizontal",
                window: *window,
            });
        }
        let expected = p.expected_y.unwrap_or(window.height() as f64 * 0.5);
        let cluster = cluster_around(ys, expected, p.max_y_spread_px);
        let top = cluster.iter().copied().fold(f64::INFINITY, f64::min);
        let bottom = cluster.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        debug!("hough locator: top={top} bottom={bottom} from {} lines", cluster.len());
        Ok((top, bottom))
    }

    /// Stave ends from near-vertical short lines; see [`fit_length`].
    fn ends(
        &self,
        roi: &ImageF32,
        edges: &Mask,
        window: &Window,
        top: f64,
        bottom: f64,
    ) -> Result<(f64, f64), LocateError> {
        let p = &self.params;
        let mut xs: Vec<f64> = hough_segments(edges, &p.short_lines)
            .iter()
            .filter(|s| s.slope() > p.min_vertical_slope)
            .map(|s| s.midpoint()[0] as f64)
            .collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();
        debug!("hough locator: {} vertical candidates {:?}", xs.len(), xs);
        if xs.is_empty() {
            return Err(LocateError::NoLinesFound {
                kind: "short vertical",
                window: *window,
            });
        }

        let length = p.expected_length_px;
        let lo = length * (1.0 - p.length_tolerance);
        let hi = length * (1.0 + p.length_tolerance);
        let spread = xs[xs.len() - 1] - xs[0];

        if spread < lo {
            warn!(
                "hough locator: end candidates span {spread:.1}px < {lo:.1}px, scoring windows of {length:.1}px"
            );
            let baseline = match p.baseline_temperature {
                Some(b) => b,
                None => roi.median().map(f64::from).unwrap_or(0.0),
            };
            let row = (((top + bottom) * 0.5) as usize).min(roi.h.saturating_sub(1));
            return best_window(roi, &xs, length, row, baseline)
                .ok_or_else(|| LocateError::not_found(window, "no end candidate leaves room for the stave"));
        }

        let xs = shrink_to_length(xs, length, hi)
            .ok_or_else(|| LocateError::not_found(window, "end candidates cannot match the stave length"))?;
        let spread = xs[xs.len() - 1] - xs[0];
        if !(lo..=hi).contains(&spread) {
            return Err(LocateError::not_found(
                window,
                format!("end separation {spread:.1}px outside [{lo:.1}, {hi:.1}]"),
            ));
        }
        Ok((xs[0], xs[xs.len() - 1]))
    }
}

/// Drop the value furthest from `expected` until all lie within `max_dist`.
/// Removes one value per iteration; the first of equally distant values goes.
fn cluster_around(mut values: Vec<f64>, expected: f64, max_dist: f64) -> Vec<f64> {
    loop {
        let furthest = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i, (v - expected).abs()))
            .fold(None::<(usize, f64)>, |best, (i, d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((i, d)),
            });
        match furthest {
            Some((i, d)) if d > max_dist && values.len() > 1 => {
                values.remove(i);
            }
            _ => return values,
        }
    }
}

/// Shrink a sorted candidate list from either end until its span is at most
/// `max_span`, each step removing the extreme whose removal leaves the span
/// closest to `length`. `None` when only two candidates remain and still
/// span too much.
fn shrink_to_length(mut xs: Vec<f64>, length: f64, max_span: f64) -> Option<Vec<f64>> {
    let span = |v: &[f64]| v[v.len() - 1] - v[0];
    while span(&xs) > max_span {
        if xs.len() <= 2 {
            return None;
        }
        let without_front = span(&xs[1..]);
        let without_back = span(&xs[..xs.len() - 1]);
        if (without_front - length).abs() < (without_back - length).abs() {
            xs.remove(0);
        } else {
            xs.pop();
        }
    }
    Some(xs)
}

/// Pick the `length`-wide stretch anchored at a candidate end whose samples
/// along `row` differ most from `baseline`. A candidate anchors the window
/// forward `[x, x + length]` when that fits, otherwise backward.
fn best_window(roi: &ImageF32, xs: &[f64], length: f64, row: usize, baseline: f64) -> Option<(f64, f64)> {
    let w = roi.w as f64;
    let mut best: Option<((f64, f64), f64)> = None;
    for &x in xs {
        let (a, b) = if x + length <= w {
            (x, x + length)
        } else if x - length >= 0.0 {
            (x - length, x)
        } else {
            continue;
        };
        let score: f64 = (a as usize..(b as usize).min(roi.w))
            .map(|col| (roi.get(col, row) as f64 - baseline).abs())
            .sum();
        debug!("hough locator: window [{a:.1}, {b:.1}] score={score:.2}");
        if best.map_or(true, |(_, s)| score > s) {
            best = Some(((a, b), score));
        }
    }
    best.map(|(span, _)| span)
}

impl StaveLocator for HoughLocator {
    fn name(&self) -> &'static str {
        "hough"
    }

    fn locate(&self, image: &ImageF32, window: &Window) -> Result<BBox, LocateError> {
        let roi = image.crop(window.x0, window.x1, window.y0, window.y1);
        debug!("hough locator: searching within {window}");
        if roi.w < 3 || roi.h < 3 {
            return Err(LocateError::not_found(window, "window smaller than 3 pixels"));
        }
        let median = roi.median().unwrap_or(0.0);
        let thresholds = CannyThresholds::from_median(median, self.params.canny_sigma);
        debug!(
            "hough locator: median={median:.3} canny thresholds=[{:.3}, {:.3}]",
            thresholds.lower, thresholds.upper
        );
        let edges = canny(&roi, thresholds, self.params.gradient_kernel);

        let (top, bottom) = self.long_edges(&edges, window)?;
        let (left, right) = self.ends(&roi, &edges, window, top, bottom)?;
        BBox::from_window_edges(window, left, right, top, bottom)
    }
}
