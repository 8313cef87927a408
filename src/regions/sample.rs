use super::{AbsRect, RegionError};
use crate::image::ImageF32;
use serde::Serialize;

/// Rectangular region: a snapshot of the pixels under `rect` and their mean.
#[derive(Clone, Debug, Serialize)]
pub struct RegionSample {
    pub rect: AbsRect,
    pub average_temperature: f64,
    #[serde(skip)]
    crop: ImageF32,
}

impl RegionSample {
    pub fn new(image: &ImageF32, rect: AbsRect) -> Result<Self, RegionError> {
        let (x0, x1, y0, y1) = rect.to_pixels(image.w, image.h);
        let crop = image.crop(x0, x1, y0, y1);
        let average_temperature = crop.mean().ok_or(RegionError::EmptyRegion { rect })?;
        Ok(Self {
            rect,
            average_temperature,
            crop,
        })
    }

    /// Pixels the average was computed from.
    pub fn crop(&self) -> &ImageF32 {
        &self.crop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f64, right: f64, top: f64, bottom: f64) -> AbsRect {
        AbsRect {
            left,
            right,
            top,
            bottom,
        }
    }

    #[test]
    fn average_over_uniform_patch() {
        let mut img = ImageF32::filled(20, 10, 18.0);
        img.fill_rect(4, 12, 2, 8, 31.0);
        assert_eq!(RegionSample::new(&img, rect(5.0, 10.0, 3.0, 6.0)).unwrap().average_temperature, 31.0);
        assert_eq!(RegionSample::new(&img, rect(13.0, 19.0, 0.0, 10.0)).unwrap().average_temperature, 18.0);
    }

    #[test]
    fn sample_keeps_its_pixels_after_the_image_changes() {
        let mut img = ImageF32::filled(20, 10, 18.0);
        img.fill_rect(4, 12, 2, 8, 31.0);
        let sample = RegionSample::new(&img, rect(4.0, 12.0, 2.0, 8.0)).unwrap();
        let pixels = sample.crop().data.clone();

        img.fill_rect(0, 20, 0, 10, -5.0);

        assert_eq!(sample.average_temperature, 31.0);
        assert_eq!(sample.crop().data, pixels);
        assert_eq!((sample.crop().w, sample.crop().h), (8, 6));
    }

    #[test]
    fn empty_rectangle_is_an_error() {
        let img = ImageF32::filled(20, 10, 18.0);
        let err = RegionSample::new(&img, rect(25.0, 30.0, 2.0, 8.0)).unwrap_err();
        assert!(matches!(err, RegionError::EmptyRegion { .. }));
    }
}
