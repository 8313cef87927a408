use super::{
    FallbackLocator, GradientProjectionLocator, GradientProjectionParams, HoughLocator,
    HoughLocatorParams, StaveLocator,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorMethod {
    #[default]
    Gradient,
    Hough,
    /// Hough first, gradient projection when it fails.
    HoughThenGradient,
}

/// Locator selection plus the tuning of both strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    pub method: LocatorMethod,
    pub gradient: GradientProjectionParams,
    pub hough: HoughLocatorParams,
}

impl LocatorParams {
    /// Adapt pixel-unit parameters to an image resampled by `factor`.
    /// Ratios and tolerances are scale free.
    pub fn scaled(mut self, factor: f64) -> Self {
        self.hough = self.hough.scaled(factor);
        self
    }

    pub fn build(&self) -> Box<dyn StaveLocator> {
        let gradient = || -> Box<dyn StaveLocator> {
            Box::new(GradientProjectionLocator::new(self.gradient))
        };
        let hough = || -> Box<dyn StaveLocator> { Box::new(HoughLocator::new(self.hough)) };
        match self.method {
            LocatorMethod::Gradient => gradient(),
            LocatorMethod::Hough => hough(),
            LocatorMethod::HoughThenGradient => Box::new(FallbackLocator::new(hough(), gradient())),
        }
    }
}
