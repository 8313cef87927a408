//! Standard region layout of a stave face.
//!
//! The stave carries `modules` sensor modules along its length. Every module
//! gets two "large" regions (outbound half, then return half) and two "small"
//! regions on the pipe bands. Return-pipe regions are added in reverse module
//! order so each region list follows the coolant. The first module's small
//! regions are inset from the stave end; the last module's small regions
//! become U-bend composites that follow the pipe turn.

use crate::regions::Bend;
use crate::stave::{Stave, StaveError};
use log::debug;
use serde::{Deserialize, Serialize};

/// Fractional coolant temperature profile from thermal FEA of a 14-module
/// stave: one point per boundary of the 28 small regions along the pipe.
pub const FEA_PROFILE: [f64; 29] = [
    0.000, 0.060, 0.109, 0.143, 0.178, 0.213, 0.247, 0.281, 0.316, 0.350, 0.384, 0.418, 0.451,
    0.485, 0.520, 0.555, 0.589, 0.623, 0.657, 0.691, 0.725, 0.760, 0.794, 0.828, 0.862, 0.896,
    0.930, 0.965, 1.000,
];

/// Relative vertical band `[top, bottom]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaveLayout {
    pub modules: usize,
    pub large_key: String,
    pub small_key: String,
    pub large_outbound: Band,
    pub large_return: Band,
    pub small_outbound: Band,
    pub small_return: Band,
    /// Start inset of the first module's small regions, in module lengths.
    pub first_module_inset: f64,
    /// U-bend radius, fraction of the stave width.
    pub u_bend_radius: f64,
    /// U-bend arm length, fraction of the stave width.
    pub u_bend_arm: f64,
    /// Shortening of the last module's start rectangle, fraction of the stave length.
    pub u_bend_end_trim: f64,
}

impl Default for StaveLayout {
    fn default() -> Self {
        Self {
            modules: 14,
            large_key: "large".to_string(),
            small_key: "small".to_string(),
            large_outbound: Band {
                top: 0.0,
                bottom: 0.5,
            },
            large_return: Band {
                top: 0.5,
                bottom: 1.0,
            },
            small_outbound: Band {
                top: 0.247826,
                bottom: 0.317391,
            },
            small_return: Band {
                top: 0.682609,
                bottom: 0.752174,
            },
            first_module_inset: 0.1,
            u_bend_radius: 0.13,
            u_bend_arm: 0.0869565,
            u_bend_end_trim: 0.0174545,
        }
    }
}

impl StaveLayout {
    fn module_span(&self, i: usize) -> (f64, f64) {
        let n = self.modules as f64;
        (i as f64 / n, (i + 1) as f64 / n)
    }

    fn add_small(&self, stave: &mut Stave, i: usize, band: Band, bend: Bend) -> Result<(), StaveError> {
        let (left, right) = self.module_span(i);
        let key = self.small_key.as_str();
        if i == 0 {
            let inset = self.first_module_inset / self.modules as f64;
            stave.add_region(left + inset, right, band.top, band.bottom, key)
        } else if i + 1 == self.modules {
            stave.add_composite_region(
                left,
                right - self.u_bend_end_trim,
                band.top,
                band.bottom,
                self.u_bend_radius,
                self.u_bend_arm,
                key,
                bend,
            )
        } else {
            stave.add_region(left, right, band.top, band.bottom, key)
        }
    }
}

/// Add the standard large and small regions to a located stave.
pub fn populate(stave: &mut Stave, layout: &StaveLayout) -> Result<(), StaveError> {
    if layout.modules == 0 {
        return Err(StaveError::InvalidArgument {
            name: "modules",
            value: "0".to_string(),
        });
    }
    debug!("populating {} modules", layout.modules);
    let n = layout.modules;
    let large = layout.large_key.as_str();
    for i in 0..n {
        let (l, r) = layout.module_span(i);
        stave.add_region(l, r, layout.large_outbound.top, layout.large_outbound.bottom, large)?;
    }
    for i in (0..n).rev() {
        let (l, r) = layout.module_span(i);
        stave.add_region(l, r, layout.large_return.top, layout.large_return.bottom, large)?;
    }
    for i in 0..n {
        layout.add_small(stave, i, layout.small_outbound, Bend::Downwards)?;
    }
    for i in (0..n).rev() {
        layout.add_small(stave, i, layout.small_return, Bend::Upwards)?;
    }
    Ok(())
}
