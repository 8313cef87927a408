//! Thermal impedance from region temperatures and the coolant heat balance.
//!
//! The coolant warms up along the pipe following a fractional profile. Each
//! region sits between two consecutive profile points; the heat it passes to
//! the liquid is the liquid's temperature rise times heat capacity and mass
//! flow (halved, since one face of the stave is modelled), and its impedance
//! is the gap between region and mean liquid temperature per unit heat.

mod correction;
mod model;
mod profile;

pub use correction::HeatCorrection;
pub use model::{combine_parallel, thermal_impedances, CoolantParams, ImpedanceModel};
pub use profile::LiquidProfile;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImpedanceError {
    #[error(
        "{regions} regions need {} liquid profile points, got {profile}",
        .regions + 1
    )]
    ProfileLengthMismatch { regions: usize, profile: usize },
    #[error("invalid liquid temperature profile: {reason}")]
    InvalidProfile { reason: String },
    #[error("no heat flows through region {index}: liquid temperature does not change")]
    ZeroHeatFlow { index: usize },
    #[error("cannot combine {outbound} outbound with {inbound} return impedances")]
    PipeLengthMismatch { outbound: usize, inbound: usize },
}
