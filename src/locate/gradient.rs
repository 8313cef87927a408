use super::{BBox, LocateError, StaveLocator, Window};
use crate::edges::{argmax, argmin, axis_gradient, project, Axis};
use crate::image::ImageF32;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientProjectionParams {
    /// Expected stave length:width ratio.
    pub expected_ratio: f64,
    /// Accepted relative deviation from `expected_ratio`.
    pub ratio_tolerance: f64,
}

impl Default for GradientProjectionParams {
    fn default() -> Self {
        Self {
            expected_ratio: 11.957,
            ratio_tolerance: 0.05,
        }
    }
}

/// Edges from the strongest rising and falling intensity transitions.
///
/// The vertical gradient summed over each row peaks at the top edge and
/// bottoms out at the bottom edge of a warm stave on a cooler background.
/// The same is then done with the horizontal gradient, restricted to the
/// row strip between those edges, for the left and right ends. Ties go to
/// the first index.
#[derive(Clone, Debug, Default)]
pub struct GradientProjectionLocator {
    pub params: GradientProjectionParams,
}

impl GradientProjectionLocator {
    pub fn new(params: GradientProjectionParams) -> Self {
        Self { params }
    }
}

/// Indices of the strongest rise and fall, ordered ascending.
fn edge_pair(profile: &[f64]) -> Option<(usize, usize)> {
    let rise = argmax(profile)?;
    let fall = argmin(profile)?;
    Some((rise.min(fall), rise.max(fall)))
}

impl StaveLocator for GradientProjectionLocator {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn locate(&self, image: &ImageF32, window: &Window) -> Result<BBox, LocateError> {
        let roi = image.crop(window.x0, window.x1, window.y0, window.y1);
        debug!("gradient locator: searching within {window}");
        if roi.w < 3 || roi.h < 3 {
            return Err(LocateError::not_found(window, "window smaller than 3 pixels"));
        }

        let gy = axis_gradient(&roi, Axis::Vertical);
        let rows = project(&gy, Axis::Horizontal);
        let (top, bottom) = edge_pair(&rows)
            .ok_or_else(|| LocateError::not_found(window, "empty row projection"))?;
        debug!("gradient locator: upper edge={top} lower edge={bottom}");
        if top == bottom {
            return Err(LocateError::not_found(window, "no horizontal transition"));
        }

        let strip = roi.crop(0, roi.w, top, bottom);
        let gx = axis_gradient(&strip, Axis::Horizontal);
        let cols = project(&gx, Axis::Vertical);
        let (left, right) = edge_pair(&cols)
            .ok_or_else(|| LocateError::not_found(window, "empty column projection"))?;
        debug!("gradient locator: left edge={left} right edge={right}");
        if left == right {
            return Err(LocateError::not_found(window, "no vertical transition"));
        }

        let measured = (right - left) as f64 / (bottom - top) as f64;
        let expected = self.params.expected_ratio;
        let deviation = (expected - measured).abs() / expected;
        debug!("gradient locator: ratio measured={measured:.4} expected={expected} deviation={deviation:.4}");
        if deviation > self.params.ratio_tolerance {
            return Err(LocateError::not_found(
                window,
                format!(
                    "length:width ratio {measured:.3} deviates {:.1}% from {expected}",
                    deviation * 100.0
                ),
            ));
        }

        BBox::from_window_edges(window, left as f64, right as f64, top as f64, bottom as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stave(w: usize, h: usize, x: (usize, usize), y: (usize, usize)) -> ImageF32 {
        let mut img = ImageF32::filled(w, h, 18.0);
        img.fill_rect(x.0, x.1, y.0, y.1, 30.0);
        img
    }

    #[test]
    fn finds_edges_of_uniform_stave() {
        let img = stave(400, 120, (50, 349), (40, 65));
        let loc = GradientProjectionLocator::default();
        let bbox = loc.locate(&img, &Window::full(400, 120)).unwrap();
        assert_eq!(bbox.y_top, 39.0);
        assert_eq!(bbox.y_bottom, 64.0);
        assert_eq!(bbox.x_left, 49.0);
        assert_eq!(bbox.x_right, 348.0);
    }

    #[test]
    fn cold_stave_gives_same_ordering() {
        let mut img = ImageF32::filled(400, 120, 30.0);
        img.fill_rect(50, 349, 40, 65, 18.0);
        let bbox = GradientProjectionLocator::default()
            .locate(&img, &Window::full(400, 120))
            .unwrap();
        assert!(bbox.y_top < bbox.y_bottom);
        assert!(bbox.x_left < bbox.x_right);
    }

    #[test]
    fn wrong_ratio_is_rejected() {
        let img = stave(400, 120, (50, 349), (30, 75));
        let err = GradientProjectionLocator::default()
            .locate(&img, &Window::full(400, 120))
            .unwrap_err();
        assert!(matches!(err, LocateError::StaveNotFound { .. }), "{err}");
    }

    #[test]
    fn tiny_window_is_rejected() {
        let img = stave(400, 120, (50, 349), (40, 65));
        let w = Window { x0: 0, x1: 2, y0: 0, y1: 120 };
        assert!(GradientProjectionLocator::default().locate(&img, &w).is_err());
    }
}
