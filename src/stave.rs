//! The `Stave` facade: one thermal image, one located stave, its regions and
//! their impedances.
//!
//! Lifecycle: `Created → Located → RegionsPopulated → ImpedancesComputed`;
//! the state never moves backwards.
//! `locate` succeeds at most once. A failed search leaves the stave
//! `Rejected` and every later call fails; analysis of that image restarts
//! from a fresh `Stave`.

use crate::image::{resize_bilinear, ImageF32};
use crate::impedance::{CoolantParams, HeatCorrection, ImpedanceError, ImpedanceModel, LiquidProfile};
use crate::locate::{BBox, LocateError, LocatorParams, StaveLocator, Window};
use crate::mask::Mask;
use crate::regions::{
    AbsRect, Bend, CompositeRegionSample, Region, RegionCatalog, RegionError, RegionSample,
    RelRect, UBend,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StaveError {
    #[error("stave was already located at {bbox}; locate can only be called once")]
    AlreadyLocated { bbox: BBox },
    #[error("stave has not been located")]
    NotLocated,
    #[error("stave was rejected by a failed search; start over with a new stave")]
    Rejected,
    #[error("invalid argument {name} = {value}")]
    InvalidArgument { name: &'static str, value: String },
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error(transparent)]
    Impedance(#[from] ImpedanceError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaveState {
    Created,
    Located,
    RegionsPopulated,
    ImpedancesComputed,
    Rejected,
}

/// Empirical end-of-stave correction coefficients (dT/dQ, K/W) per region type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionParams {
    pub dt_dq: BTreeMap<String, f64>,
}

/// Physical and algorithmic parameters of one stave analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct StaveParams {
    pub coolant: CoolantParams,
    pub profile: LiquidProfile,
    pub correction: Option<CorrectionParams>,
    pub locator: LocatorParams,
    /// Outline thickness used by [`Stave::draw_edges`] and [`Stave::draw_regions`].
    pub line_thickness: f64,
}

impl StaveParams {
    pub fn new(coolant: CoolantParams, profile: LiquidProfile) -> Self {
        Self {
            coolant,
            profile,
            correction: None,
            locator: LocatorParams::default(),
            line_thickness: 2.0,
        }
    }
}

/// Per-type summary for reports.
#[derive(Clone, Debug, Serialize)]
pub struct RegionTypeReport {
    pub key: String,
    pub bounds: Vec<AbsRect>,
    pub temperatures: Vec<f64>,
    pub impedances: Vec<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StaveReport {
    pub bbox: BBox,
    pub length: f64,
    pub width: f64,
    pub scale: f64,
    pub regions: Vec<RegionTypeReport>,
}

pub struct Stave {
    image: ImageF32,
    params: StaveParams,
    scale: f64,
    bbox: Option<BBox>,
    state: StaveState,
    regions: RegionCatalog<String>,
}

impl Stave {
    pub fn new(image: ImageF32, params: StaveParams) -> Self {
        debug!(
            "new stave: image {}x{}, coolant {:?}, {} profile points",
            image.w,
            image.h,
            params.coolant,
            params.profile.len()
        );
        Self {
            image,
            params,
            scale: 1.0,
            bbox: None,
            state: StaveState::Created,
            regions: RegionCatalog::new(),
        }
    }

    pub fn state(&self) -> StaveState {
        self.state
    }

    pub fn params(&self) -> &StaveParams {
        &self.params
    }

    pub fn image(&self) -> &ImageF32 {
        &self.image
    }

    /// Accumulated resampling factor applied by [`Stave::scale_image`].
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn ensure_unlocated(&self) -> Result<(), StaveError> {
        match (self.state, self.bbox) {
            (StaveState::Rejected, _) => Err(StaveError::Rejected),
            (_, Some(bbox)) => Err(StaveError::AlreadyLocated { bbox }),
            _ => Ok(()),
        }
    }

    fn located_bbox(&self) -> Result<BBox, StaveError> {
        match (self.state, self.bbox) {
            (StaveState::Rejected, _) => Err(StaveError::Rejected),
            (_, Some(bbox)) => Ok(bbox),
            (_, None) => Err(StaveError::NotLocated),
        }
    }

    /// Resample the image by `factor` (bilinear). Pixel-unit locator
    /// parameters and the drawing thickness follow the image. Only valid
    /// before [`Stave::locate`].
    pub fn scale_image(&mut self, factor: f64) -> Result<(), StaveError> {
        self.ensure_unlocated()?;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(StaveError::InvalidArgument {
                name: "scale",
                value: factor.to_string(),
            });
        }
        debug!("scaling image: scale = {factor}");
        let scaled = resize_bilinear(&self.image, factor as f32);
        if scaled.is_empty() {
            return Err(StaveError::InvalidArgument {
                name: "scale",
                value: format!("{factor} (empties a {}x{} image)", self.image.w, self.image.h),
            });
        }
        self.image = scaled;
        self.params.locator = self.params.locator.scaled(factor);
        self.params.line_thickness *= factor;
        self.scale *= factor;
        Ok(())
    }

    /// Locate with the locator selected by the parameters.
    pub fn locate(
        &mut self,
        rel_x_min: f64,
        rel_x_max: f64,
        rel_y_min: f64,
        rel_y_max: f64,
    ) -> Result<BBox, StaveError> {
        let locator = self.params.locator.build();
        self.locate_with(locator.as_ref(), rel_x_min, rel_x_max, rel_y_min, rel_y_max)
    }

    /// Find the stave within the relative window using `locator`.
    ///
    /// An invalid window is reported without changing state; a failed search
    /// rejects the stave.
    pub fn locate_with(
        &mut self,
        locator: &dyn StaveLocator,
        rel_x_min: f64,
        rel_x_max: f64,
        rel_y_min: f64,
        rel_y_max: f64,
    ) -> Result<BBox, StaveError> {
        self.ensure_unlocated()?;
        let window = Window::from_relative(
            rel_x_min,
            rel_x_max,
            rel_y_min,
            rel_y_max,
            self.image.w,
            self.image.h,
        )?;
        debug!("locating stave with {} locator within {window}", locator.name());
        match locator.locate(&self.image, &window) {
            Ok(bbox) => {
                info!(
                    "stave found by {} locator: {bbox} (length {:.1}, width {:.1})",
                    locator.name(),
                    bbox.length(),
                    bbox.width()
                );
                self.bbox = Some(bbox);
                self.state = StaveState::Located;
                Ok(bbox)
            }
            Err(err) => {
                self.state = StaveState::Rejected;
                Err(err.into())
            }
        }
    }

    pub fn bbox(&self) -> Result<BBox, StaveError> {
        self.located_bbox()
    }

    pub fn length(&self) -> Result<f64, StaveError> {
        Ok(self.located_bbox()?.length())
    }

    pub fn width(&self) -> Result<f64, StaveError> {
        Ok(self.located_bbox()?.width())
    }

    /// Bounding box as `[xLeft, xRight, yTop, yBottom]`.
    pub fn echo(&self) -> Result<String, StaveError> {
        Ok(self.located_bbox()?.to_string())
    }

    fn push_region(&mut self, key: String, region: Region) {
        self.regions.push(key, region);
        if self.state == StaveState::Located {
            self.state = StaveState::RegionsPopulated;
        }
    }

    /// Add a rectangular region given in stave-relative coordinates.
    pub fn add_region(
        &mut self,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
        key: impl Into<String>,
    ) -> Result<(), StaveError> {
        let bbox = self.located_bbox()?;
        let key = key.into();
        let rel = RelRect::new(left, right, top, bottom)?;
        debug!("adding region of type '{key}': {rel}");
        let sample = RegionSample::new(&self.image, rel.to_absolute(&bbox))?;
        self.push_region(key, Region::Rect(sample));
        Ok(())
    }

    /// Add a U-bend region: the start rectangle (stave-relative), a quarter
    /// arc of `radius` and an arm of `arm_length`, both fractions of the
    /// stave width.
    #[allow(clippy::too_many_arguments)]
    pub fn add_composite_region(
        &mut self,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
        radius: f64,
        arm_length: f64,
        key: impl Into<String>,
        bend: Bend,
    ) -> Result<(), StaveError> {
        let bbox = self.located_bbox()?;
        let key = key.into();
        let rel = RelRect::new(left, right, top, bottom)?;
        debug!("adding {bend} u-bend region of type '{key}': {rel} radius={radius} arm={arm_length}");
        let mask = UBend::new(radius, arm_length, bend).rasterize(&bbox, &rel, self.image.w, self.image.h);
        let sample = CompositeRegionSample::new(&self.image, mask)?;
        self.push_region(key, Region::Composite(sample));
        Ok(())
    }

    /// Add a region sampled through an arbitrary mask.
    pub fn add_mask_region(&mut self, mask: Mask, key: impl Into<String>) -> Result<(), StaveError> {
        self.located_bbox()?;
        let sample = CompositeRegionSample::new(&self.image, mask)?;
        self.push_region(key.into(), Region::Composite(sample));
        Ok(())
    }

    pub fn regions(&self) -> &RegionCatalog<String> {
        &self.regions
    }

    pub fn types_present(&self) -> impl Iterator<Item = &str> + '_ {
        self.regions.types_present().map(String::as_str)
    }

    pub fn temperatures(&self, key: &str) -> Result<Vec<f64>, StaveError> {
        self.located_bbox()?;
        Ok(self.regions.temperatures(&key.to_string())?)
    }

    pub fn set_liquid_profile(&mut self, profile: LiquidProfile) {
        debug!("re-setting the temperature profile: {:?}", profile.values());
        self.params.profile = profile;
    }

    fn correction_for(&self, key: &str) -> Result<Option<HeatCorrection>, StaveError> {
        let dt_dq = self
            .params
            .correction
            .as_ref()
            .and_then(|c| c.dt_dq.get(key).copied());
        match dt_dq {
            Some(k) => Ok(Some(HeatCorrection::end_of_stave(
                &self.params.profile,
                &self.params.coolant,
                k,
            )?)),
            None => Ok(None),
        }
    }

    /// Impedance of every region of one type, in insertion order, applying
    /// the end-of-stave correction when a coefficient is configured for `key`.
    pub fn impedances(&mut self, key: &str) -> Result<Vec<f64>, StaveError> {
        debug!("calculating impedances of region type '{key}'");
        let temps = self.temperatures(key)?;
        let correction = self.correction_for(key)?;
        let model = ImpedanceModel::new(self.params.coolant);
        let impedances = model.impedances(&temps, &self.params.profile, correction.as_ref())?;
        self.state = StaveState::ImpedancesComputed;
        Ok(impedances)
    }

    /// Outline of the stave's bounding box.
    pub fn draw_edges(&self, canvas: &mut Mask) -> Result<(), StaveError> {
        let b = self.located_bbox()?;
        canvas.stroke_rect(
            (b.x_left as i64, b.y_top as i64),
            (b.x_right as i64, b.y_bottom as i64),
            self.thickness_px(),
        );
        Ok(())
    }

    pub fn draw_regions(&self, canvas: &mut Mask, key: &str) -> Result<(), StaveError> {
        self.located_bbox()?;
        let t = self.thickness_px();
        for region in self.regions.get(&key.to_string())? {
            region.draw_into(canvas, t);
        }
        Ok(())
    }

    fn thickness_px(&self) -> i64 {
        (self.params.line_thickness as i64).max(1)
    }

    /// Bounding box, temperatures and impedances of the requested types.
    pub fn report(&mut self, keys: &[&str]) -> Result<StaveReport, StaveError> {
        let bbox = self.located_bbox()?;
        let mut regions = Vec::with_capacity(keys.len());
        for &key in keys {
            let bounds = self
                .regions
                .get(&key.to_string())?
                .iter()
                .map(Region::bounds)
                .collect();
            regions.push(RegionTypeReport {
                key: key.to_string(),
                bounds,
                temperatures: self.temperatures(key)?,
                impedances: self.impedances(key)?,
            });
        }
        Ok(StaveReport {
            bbox,
            length: bbox.length(),
            width: bbox.width(),
            scale: self.scale,
            regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::GradientProjectionLocator;

    fn params() -> StaveParams {
        StaveParams::new(
            CoolantParams {
                temp_in: 20.0,
                temp_out: 28.0,
                c_liquid: 4000.0,
                flow_rate: 1.2,
            },
            LiquidProfile::linear(4).unwrap(),
        )
    }

    fn image() -> ImageF32 {
        let mut img = ImageF32::filled(400, 120, 18.0);
        img.fill_rect(50, 349, 40, 65, 30.0);
        img
    }

    #[test]
    fn lifecycle_states() {
        let mut s = Stave::new(image(), params());
        assert_eq!(s.state(), StaveState::Created);
        s.locate(0.0, 1.0, 0.0, 1.0).unwrap();
        assert_eq!(s.state(), StaveState::Located);
        for i in 0..4 {
            s.add_region(i as f64 / 4.0, (i + 1) as f64 / 4.0, 0.2, 0.8, "large").unwrap();
        }
        assert_eq!(s.state(), StaveState::RegionsPopulated);
        s.impedances("large").unwrap();
        assert_eq!(s.state(), StaveState::ImpedancesComputed);
        assert_eq!(s.echo().unwrap(), "[49, 348, 39, 64]");
    }

    #[test]
    fn scale_is_refused_after_locate() {
        let mut s = Stave::new(image(), params());
        s.locate(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(matches!(s.scale_image(2.0), Err(StaveError::AlreadyLocated { .. })));
    }

    #[test]
    fn scale_that_empties_the_image_is_refused() {
        let mut s = Stave::new(image(), params());
        let err = s.scale_image(1e-4).unwrap_err();
        assert!(matches!(err, StaveError::InvalidArgument { name: "scale", .. }), "{err}");
        assert_eq!((s.image().w, s.image().h), (400, 120));
        assert_eq!(s.scale(), 1.0);
        assert!(s.locate(0.0, 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn regions_added_after_impedances_keep_the_final_state() {
        let mut s = Stave::new(image(), params());
        s.locate(0.0, 1.0, 0.0, 1.0).unwrap();
        for i in 0..4 {
            s.add_region(i as f64 / 4.0, (i + 1) as f64 / 4.0, 0.2, 0.8, "large").unwrap();
        }
        s.impedances("large").unwrap();
        s.add_region(0.0, 0.5, 0.2, 0.8, "small").unwrap();
        assert_eq!(s.state(), StaveState::ImpedancesComputed);
        assert_eq!(s.temperatures("small").unwrap().len(), 1);
    }

    #[test]
    fn failed_search_rejects_the_stave() {
        let mut s = Stave::new(ImageF32::filled(400, 120, 18.0), params());
        let err = s
            .locate_with(&GradientProjectionLocator::default(), 0.0, 1.0, 0.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, StaveError::Locate(_)), "{err}");
        assert_eq!(s.state(), StaveState::Rejected);
        assert_eq!(s.locate(0.0, 1.0, 0.0, 1.0).unwrap_err(), StaveError::Rejected);
        assert_eq!(
            s.add_region(0.0, 0.5, 0.0, 0.5, "large").unwrap_err(),
            StaveError::Rejected
        );
    }

    #[test]
    fn invalid_window_keeps_stave_usable() {
        let mut s = Stave::new(image(), params());
        let err = s.locate(0.8, 0.2, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, StaveError::Locate(LocateError::InvalidWindow { .. })));
        assert_eq!(s.state(), StaveState::Created);
        assert!(s.locate(0.0, 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn correction_shifts_first_regions() {
        let mut p = params();
        p.profile = LiquidProfile::new(vec![0.0, 0.4, 0.6, 0.7, 1.0]).unwrap();
        let mut plain = Stave::new(image(), p.clone());
        p.correction = Some(CorrectionParams {
            dt_dq: BTreeMap::from([("large".to_string(), 0.01)]),
        });
        let mut corrected = Stave::new(image(), p);
        for s in [&mut plain, &mut corrected] {
            s.locate(0.0, 1.0, 0.0, 1.0).unwrap();
            for i in 0..4 {
                s.add_region(i as f64 / 4.0, (i + 1) as f64 / 4.0, 0.2, 0.8, "large")
                    .unwrap();
            }
        }
        let a = plain.impedances("large").unwrap();
        let b = corrected.impedances("large").unwrap();
        assert_ne!(a[0], b[0]);
        assert_ne!(a[1], b[1]);
        assert_eq!(a[2], b[2]);
        assert_eq!(a[3], b[3]);
    }
}
