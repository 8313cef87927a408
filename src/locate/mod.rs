//! Stave localization.
//!
//! A locator finds the stave's bounding rectangle inside a window of the
//! thermal image. Two independent strategies are provided:
//!
//! - [`GradientProjectionLocator`]: projections of the axis gradients; fast
//!   and exact on clean images, validated by the expected length:width ratio.
//! - [`HoughLocator`]: Canny edges plus two Hough passes (long near-horizontal
//!   lines for the long edges, short near-vertical lines for the ends) with
//!   length-driven heuristics for incomplete or cluttered end candidates.
//!
//! Neither strategy relaxes its own thresholds on failure. Trying a second
//! strategy is an explicit composition, see [`FallbackLocator`].

mod fallback;
mod gradient;
mod hough;
mod params;
mod window;

pub use fallback::FallbackLocator;
pub use gradient::{GradientProjectionLocator, GradientProjectionParams};
pub use hough::{HoughLocator, HoughLocatorParams};
pub use params::{LocatorMethod, LocatorParams};
pub use window::{BBox, Window};

use crate::image::ImageF32;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocateError {
    #[error(
        "invalid search window x=[{x_min}, {x_max}] y=[{y_min}, {y_max}]: \
         minimum above maximum or outside [0, 1]"
    )]
    InvalidWindow {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    #[error("stave not found in window {window}: {reason}")]
    StaveNotFound { window: Window, reason: String },
    #[error("no {kind} lines found in window {window}")]
    NoLinesFound { kind: &'static str, window: Window },
}

impl LocateError {
    pub(crate) fn not_found(window: &Window, reason: impl Into<String>) -> Self {
        LocateError::StaveNotFound {
            window: *window,
            reason: reason.into(),
        }
    }
}

/// Strategy that finds the stave's bounding box inside a search window.
pub trait StaveLocator {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Bounding box in absolute image pixels.
    fn locate(&self, image: &ImageF32, window: &Window) -> Result<BBox, LocateError>;
}
