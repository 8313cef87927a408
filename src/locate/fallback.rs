use super::{BBox, LocateError, StaveLocator, Window};
use crate::image::ImageF32;
use log::warn;

/// Runs `secondary` only when `primary` fails. When both fail the
/// secondary's error is returned; the primary's is logged.
pub struct FallbackLocator {
    pub primary: Box<dyn StaveLocator>,
    pub secondary: Box<dyn StaveLocator>,
}

impl FallbackLocator {
    pub fn new(primary: Box<dyn StaveLocator>, secondary: Box<dyn StaveLocator>) -> Self {
        Self { primary, secondary }
    }
}

impl StaveLocator for FallbackLocator {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn locate(&self, image: &ImageF32, window: &Window) -> Result<BBox, LocateError> {
        match self.primary.locate(image, window) {
            Ok(bbox) => Ok(bbox),
            Err(err) => {
                warn!(
                    "{} locator failed ({err}); falling back to {}",
                    self.primary.name(),
                    self.secondary.name()
                );
                self.secondary.locate(image, window).map_err(|second| {
                    warn!("{} locator failed as well: {second}", self.secondary.name());
                    second
                })
            }
        }
    }
}
