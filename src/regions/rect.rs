use super::RegionError;
use crate::locate::BBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region descriptor relative to the stave: `0.0` is the left/top edge,
/// `1.0` the right/bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl RelRect {
    /// Validated descriptor: every value in `[0, 1]`, `left < right`, `top < bottom`.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Result<Self, RegionError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        let valid = [left, right, top, bottom].into_iter().all(in_unit)
            && left < right
            && top < bottom;
        if !valid {
            return Err(RegionError::InvalidCoordinate {
                left,
                right,
                top,
                bottom,
            });
        }
        Ok(Self {
            left,
            right,
            top,
            bottom,
        })
    }

    /// `abs = origin + rel * extent` using the stave's own length and width.
    pub fn to_absolute(&self, stave: &BBox) -> AbsRect {
        let (length, width) = (stave.length(), stave.width());
        AbsRect {
            left: stave.x_left + self.left * length,
            right: stave.x_left + self.right * length,
            top: stave.y_top + self.top * width,
            bottom: stave.y_top + self.bottom * width,
        }
    }
}

impl fmt::Display for RelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.right, self.top, self.bottom
        )
    }
}

/// Rectangle in absolute (sub-)pixel coordinates of the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AbsRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl AbsRect {
    /// Half-open pixel span `(x0, x1, y0, y1)`: coordinates are truncated
    /// towards zero and clamped to a `width × height` image.
    pub fn to_pixels(&self, width: usize, height: usize) -> (usize, usize, usize, usize) {
        let px = |v: f64, max: usize| (v.max(0.0) as usize).min(max);
        (
            px(self.left, width),
            px(self.right, width),
            px(self.top, height),
            px(self.bottom, height),
        )
    }
}

impl fmt::Display for AbsRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}, {:.2}, {:.2}]",
            self.left, self.right, self.top, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_maps_onto_stave_extent() {
        let stave = BBox {
            x_left: 100.0,
            x_right: 300.0,
            y_top: 50.0,
            y_bottom: 70.0,
        };
        let abs = RelRect::new(0.25, 0.5, 0.0, 0.5).unwrap().to_absolute(&stave);
        assert_eq!(
            abs,
            AbsRect {
                left: 150.0,
                right: 200.0,
                top: 50.0,
                bottom: 60.0
            }
        );
    }

    #[test]
    fn pixels_truncate_and_clamp() {
        let r = AbsRect {
            left: -3.0,
            right: 12.9,
            top: 2.7,
            bottom: 40.0,
        };
        assert_eq!(r.to_pixels(10, 20), (0, 10, 2, 20));
    }

    #[test]
    fn rejects_nan() {
        assert!(RelRect::new(f64::NAN, 0.5, 0.0, 1.0).is_err());
    }
}
