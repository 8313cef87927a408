//! Edge processing utilities: gradients, axis projections and binary edge maps.
//!
//! - Gradient computation (Sobel/Scharr) returning `gx`, `gy` and magnitude.
//! - Array-style discrete gradients along one axis with first-index
//!   `argmax`/`argmin`, used by the projection locator.
//! - Non‑maximum suppression and a Canny-style hysteresis edge map, used by
//!   the Hough locator.
//!
//! Borders are handled by clamping indices (replicate).

pub mod axis;
pub mod canny;
pub mod grad;
pub mod nms;

pub use axis::{argmax, argmin, axis_gradient, project, Axis};
pub use canny::{canny, CannyThresholds};
pub use grad::{image_gradients, Grad, GradientKernel};
pub use nms::suppress_non_maxima;
