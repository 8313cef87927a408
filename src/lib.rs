#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod image;
pub mod impedance;
pub mod layout;
pub mod locate;
pub mod regions;
pub mod stave;

// Building blocks of the locators – public, but considered internals.
pub mod config;
pub mod edges;
pub mod mask;
pub mod segments;

// --- High-level re-exports -------------------------------------------------

pub use crate::impedance::{CoolantParams, LiquidProfile};
pub use crate::layout::{populate, StaveLayout};
pub use crate::locate::{BBox, LocatorMethod, LocatorParams, StaveLocator};
pub use crate::stave::{Stave, StaveError, StaveParams, StaveReport, StaveState};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick analyses.
///
/// ```no_run
/// use stave_thermal::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let image = ImageF32::filled(640, 480, 20.0);
/// let params = StaveParams::new(
///     CoolantParams { temp_in: -30.0, temp_out: -25.0, c_liquid: 2000.0, flow_rate: 1.5 },
///     LiquidProfile::linear(28)?,
/// );
/// let mut stave = Stave::new(image, params);
/// stave.locate(0.0, 1.0, 0.0, 0.5)?;
/// populate(&mut stave, &StaveLayout::default())?;
/// println!("{:?}", stave.impedances("small")?);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageF32;
    pub use crate::regions::Bend;
    pub use crate::{
        populate, CoolantParams, LiquidProfile, LocatorMethod, LocatorParams, Stave, StaveLayout,
        StaveParams,
    };
}
