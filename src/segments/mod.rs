//! Progressive probabilistic-style Hough line-segment extraction.
//!
//! The extractor works on a binary edge map (see [`crate::edges::canny`]):
//!
//! - Every edge pixel votes into a `(theta, rho)` accumulator, with
//!   `rho = x cos(theta) + y sin(theta)` and `theta` in `[0, pi)`.
//! - Accumulator local maxima at or above `threshold` become line candidates,
//!   processed strongest first.
//! - For each candidate the still-unused edge pixels within
//!   `max_distance_px` of the line are projected onto it, split wherever
//!   consecutive projections are more than `max_line_gap` apart, and each
//!   run spanning at least `min_line_length` becomes a [`Segment`]. Pixels
//!   of an emitted segment are not reused by later candidates.
//!
//! The procedure is fully deterministic: identical inputs produce identical
//! segment lists in identical order.

mod hough;
mod options;
mod segment;

#[cfg(test)]
mod tests;

pub use options::HoughOptions;
pub use segment::{Segment, SegmentId};

use crate::mask::Mask;

/// Extract line segments from a binary edge map.
pub fn hough_segments(edges: &Mask, options: &HoughOptions) -> Vec<Segment> {
    hough::HoughExtractor::new(edges, options).extract()
}
