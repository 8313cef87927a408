use super::{RegionError, RelRect};
use crate::image::{ImageF32, ImageView};
use crate::locate::BBox;
use crate::mask::{Mask, PixelBounds};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mask-defined region: the mean over the set pixels of the mask.
#[derive(Clone, Debug, Serialize)]
pub struct CompositeRegionSample {
    pub bounds: PixelBounds,
    pub average_temperature: f64,
    pub pixel_count: usize,
    #[serde(skip)]
    mask: Mask,
}

impl CompositeRegionSample {
    /// Pixels of `mask` outside `image` are ignored.
    pub fn new(image: &ImageF32, mask: Mask) -> Result<Self, RegionError> {
        let mut sum = 0.0f64;
        let mut pixel_count = 0usize;
        for (x, y) in mask.points() {
            if x < image.width() && y < image.height() {
                sum += image.get(x, y) as f64;
                pixel_count += 1;
            }
        }
        let bounds = match mask.bounds() {
            Some(b) if pixel_count > 0 => b,
            _ => return Err(RegionError::EmptyMask),
        };
        Ok(Self {
            bounds,
            average_temperature: sum / pixel_count as f64,
            pixel_count,
            mask,
        })
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }
}

/// Direction the pipe turns at the end of the stave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bend {
    Upwards,
    Downwards,
}

impl FromStr for Bend {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upwards" => Ok(Bend::Upwards),
            "downwards" => Ok(Bend::Downwards),
            other => Err(RegionError::InvalidArgument {
                name: "bend",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Bend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bend::Upwards => "upwards",
            Bend::Downwards => "downwards",
        })
    }
}

/// Pipe turn at the end of a stave: the start rectangle, a quarter annulus
/// as thick as the rectangle, and a perpendicular arm.
///
/// `radius` and `arm_length` are fractions of the stave width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UBend {
    pub radius: f64,
    pub arm_length: f64,
    pub bend: Bend,
}

impl UBend {
    pub fn new(radius: f64, arm_length: f64, bend: Bend) -> Self {
        Self {
            radius,
            arm_length,
            bend,
        }
    }

    /// Rasterise the U-bend starting at `start` on a `width × height` mask.
    pub fn rasterize(&self, stave: &BBox, start: &RelRect, width: usize, height: usize) -> Mask {
        let abs = start.to_absolute(stave);
        let x_left1 = abs.left as i64;
        let x_right1 = abs.right as i64;
        let y_top1 = abs.top as i64;
        let y_bottom1 = abs.bottom as i64;

        let radius_px = self.radius * stave.width();
        let radius = radius_px as i64;
        let thickness = y_bottom1 - y_top1;
        let mid_y = 0.5 * (y_top1 + y_bottom1) as f64;

        let (centre_y, start_deg, stop_deg) = match self.bend {
            Bend::Upwards => ((mid_y - radius_px) as i64, 0.0, 90.0),
            Bend::Downwards => ((mid_y + radius_px) as i64, 270.0, 360.0),
        };

        let half_t = thickness as f64 / 2.0;
        let arm_px = self.arm_length * stave.width();
        let x_left2 = (x_right1 as f64 + radius as f64 - half_t) as i64;
        let x_right2 = x_left2 + thickness;
        let (y_top2, y_bottom2) = match self.bend {
            Bend::Upwards => {
                let top = (y_bottom1 as f64 - radius as f64 - half_t) as i64;
                (top, (top as f64 - arm_px) as i64)
            }
            Bend::Downwards => {
                let top = (y_bottom1 as f64 + radius as f64 - half_t) as i64;
                (top, (top as f64 + arm_px) as i64)
            }
        };

        let mut mask = Mask::new(width, height);
        mask.fill_rect((x_left1, y_top1), (x_right1, y_bottom1));
        mask.fill_arc_band(
            Point2::new(x_right1 as f64, centre_y as f64),
            radius as f64,
            thickness as f64,
            start_deg,
            stop_deg,
        );
        mask.fill_rect((x_left2, y_top2), (x_right2, y_bottom2));
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stave() -> BBox {
        BBox {
            x_left: 20.0,
            x_right: 220.0,
            y_top: 40.0,
            y_bottom: 140.0,
        }
    }

    #[test]
    fn composite_keeps_its_average_after_the_image_changes() {
        let mut img = ImageF32::filled(30, 20, 18.0);
        img.fill_rect(5, 15, 4, 10, 27.0);
        let mut mask = Mask::new(30, 20);
        mask.fill_rect((5, 4), (14, 9));
        let sample = CompositeRegionSample::new(&img, mask.clone()).unwrap();

        img.fill_rect(0, 30, 0, 20, 90.0);

        assert_eq!(sample.average_temperature, 27.0);
        assert_eq!(sample.pixel_count, 60);
        assert_eq!(sample.mask(), &mask);
    }

    #[test]
    fn bend_parses_only_known_literals() {
        assert_eq!("upwards".parse::<Bend>().unwrap(), Bend::Upwards);
        assert_eq!("downwards".parse::<Bend>().unwrap(), Bend::Downwards);
        let err = "sideways".parse::<Bend>().unwrap_err();
        assert!(matches!(err, RegionError::InvalidArgument { .. }));
    }

    #[test]
    fn downward_bend_turns_below_the_start_rectangle() {
        let start = RelRect::new(0.5, 0.9, 0.2, 0.3).unwrap();
        let mask = UBend::new(0.2, 0.1, Bend::Downwards).rasterize(&stave(), &start, 300, 250);
        let b = mask.bounds().unwrap();
        // start rect x 120..=200, y 60..=70; radius 20, centre (200, 85)
        assert_eq!(b.x_min, 120);
        assert_eq!(b.y_min, 60);
        assert!(b.x_max > 200 && b.x_max <= 226, "x_max={}", b.x_max);
        assert!(b.y_max >= 85, "y_max={}", b.y_max);
        // arm: x 215..=225, y 85..=95
        assert!(mask.get(220, 84));
        assert!(!mask.get(180, 90));
    }

    #[test]
    fn upward_bend_mirrors_the_downward_one() {
        let start = RelRect::new(0.5, 0.9, 0.7, 0.8).unwrap();
        let mask = UBend::new(0.2, 0.1, Bend::Upwards).rasterize(&stave(), &start, 300, 250);
        let b = mask.bounds().unwrap();
        // start rect y 110..=120; arm spans upwards from y 85 to 95
        assert_eq!(b.y_max, 120);
        assert!(b.y_min <= 95, "y_min={}", b.y_min);
        assert!(mask.get(220, 90));
    }

    #[test]
    fn composite_average_matches_rectangle() {
        let mut img = ImageF32::filled(50, 40, 18.0);
        img.fill_rect(10, 30, 5, 25, 30.0);
        let mut mask = Mask::new(50, 40);
        mask.fill_rect((10, 5), (29, 24));
        let c = CompositeRegionSample::new(&img, mask).unwrap();
        assert_eq!(c.average_temperature, 30.0);
        assert_eq!(c.pixel_count, 400);
        assert_eq!(
            c.bounds,
            PixelBounds {
                x_min: 10,
                x_max: 29,
                y_min: 5,
                y_max: 24
            }
        );
    }

    #[test]
    fn empty_mask_is_an_error() {
        let img = ImageF32::filled(8, 8, 1.0);
        assert!(matches!(
            CompositeRegionSample::new(&img, Mask::new(8, 8)),
            Err(RegionError::EmptyMask)
        ));
    }
}
