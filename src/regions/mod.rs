//! Region geometry and sampling.
//!
//! Regions are described relative to a located stave ([`RelRect`]), mapped to
//! absolute image coordinates and sampled once: later changes to the image do
//! not affect an already computed average.

mod catalog;
mod composite;
mod rect;
mod sample;

pub use catalog::RegionCatalog;
pub use composite::{Bend, CompositeRegionSample, UBend};
pub use rect::{AbsRect, RelRect};
pub use sample::RegionSample;

use crate::mask::Mask;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegionError {
    #[error(
        "invalid region coordinates [left={left}, right={right}, top={top}, bottom={bottom}]: \
         values must lie in [0, 1] with left < right and top < bottom"
    )]
    InvalidCoordinate {
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
    },
    #[error("invalid argument {name} = {value:?}")]
    InvalidArgument { name: &'static str, value: String },
    #[error("composite region selects no pixels")]
    EmptyMask,
    #[error("region {rect} selects no pixels")]
    EmptyRegion { rect: AbsRect },
    #[error("no regions of type {key}")]
    UnknownRegionType { key: String },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Region {
    Rect(RegionSample),
    Composite(CompositeRegionSample),
}

impl Region {
    pub fn average_temperature(&self) -> f64 {
        match self {
            Region::Rect(r) => r.average_temperature,
            Region::Composite(c) => c.average_temperature,
        }
    }

    /// Absolute extent; for composites the inclusive bounds of the mask.
    pub fn bounds(&self) -> AbsRect {
        match self {
            Region::Rect(r) => r.rect,
            Region::Composite(c) => AbsRect {
                left: c.bounds.x_min as f64,
                right: c.bounds.x_max as f64,
                top: c.bounds.y_min as f64,
                bottom: c.bounds.y_max as f64,
            },
        }
    }

    /// Rectangles as outlines of `thickness` pixels, composites filled.
    pub fn draw_into(&self, canvas: &mut Mask, thickness: i64) {
        match self {
            Region::Rect(r) => {
                let a = (r.rect.left as i64, r.rect.top as i64);
                let b = (r.rect.right as i64, r.rect.bottom as i64);
                canvas.stroke_rect(a, b, thickness);
            }
            Region::Composite(c) => canvas.union_with(c.mask()),
        }
    }
}
