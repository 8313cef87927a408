use super::{CoolantParams, ImpedanceError, LiquidProfile};
use log::debug;
use std::collections::BTreeMap;

/// Additive temperature shifts applied to region temperatures by index
/// before the impedance formula.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeatCorrection {
    shifts: BTreeMap<usize, f64>,
}

impl HeatCorrection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self, index: usize, delta: f64) -> Self {
        *self.shifts.entry(index).or_insert(0.0) += delta;
        self
    }

    pub fn shift(&self, index: usize) -> f64 {
        self.shifts.get(&index).copied().unwrap_or(0.0)
    }

    pub fn shifts(&self) -> &BTreeMap<usize, f64> {
        &self.shifts
    }

    /// Shifted copy of `temps`; indices past the end are ignored.
    pub fn apply(&self, temps: &[f64]) -> Vec<f64> {
        temps
            .iter()
            .enumerate()
            .map(|(i, t)| t + self.shift(i))
            .collect()
    }

    /// Correction for the end-of-stave connector next to region 0.
    ///
    /// The first three profile segments carry the heat fractions `Q_0..Q_2`
    /// of the one-face total. The connector keeps `Q_0 - Q_1` and hands
    /// `Q_1 - Q_2` on to region 1; each is converted to a temperature shift
    /// with the empirical coefficient `dt_dq` (K/W).
    pub fn end_of_stave(
        profile: &LiquidProfile,
        coolant: &CoolantParams,
        dt_dq: f64,
    ) -> Result<Self, ImpedanceError> {
        let p = profile.values();
        if p.len() < 4 {
            return Err(ImpedanceError::InvalidProfile {
                reason: format!(
                    "end-of-stave correction needs three profile segments, got {}",
                    p.len() - 1
                ),
            });
        }
        let span = (p[p.len() - 1] - p[0]).abs();
        if span == 0.0 {
            return Err(ImpedanceError::InvalidProfile {
                reason: "profile has no temperature rise".to_string(),
            });
        }
        let total = coolant.total_heat();
        let q: Vec<f64> = (0..3).map(|k| (p[k + 1] - p[k]).abs() / span * total).collect();
        let eos = q[0] - q[1];
        let passed = q[1] - q[2];
        debug!("end-of-stave heat: total={total:.4} connector={eos:.4} passed={passed:.4}");
        Ok(Self::new()
            .with_shift(0, dt_dq * eos)
            .with_shift(1, dt_dq * passed))
    }
}
