//! Single-channel temperature images and their I/O.
//!
//! Every image in the crate is addressed as `(x, y)` = `(column, row)` with
//! `y` growing downwards. Nothing in the pipeline transposes a buffer, so a
//! bounding box found by a locator can be used directly to crop or mask the
//! same image.

pub mod f32;
pub mod io;
pub mod resample;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::resample::resize_bilinear;
pub use self::traits::{ImageView, ImageViewMut, Rows};
