use super::{HeatCorrection, ImpedanceError, LiquidProfile};
use log::debug;
use serde::{Deserialize, Serialize};

/// Coolant loop constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoolantParams {
    /// Inlet temperature, °C.
    pub temp_in: f64,
    /// Outlet temperature, °C.
    pub temp_out: f64,
    /// Specific heat capacity of the liquid, J/(kg·K).
    pub c_liquid: f64,
    /// Mass flow, kg/min.
    pub flow_rate: f64,
}

impl CoolantParams {
    pub fn flow_rate_per_sec(&self) -> f64 {
        self.flow_rate / 60.0
    }

    /// Heat absorbed by the liquid between inlet and outlet for one face.
    pub fn total_heat(&self) -> f64 {
        (self.temp_out - self.temp_in).abs() * self.c_liquid * 0.5 * self.flow_rate_per_sec()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpedanceModel {
    pub coolant: CoolantParams,
}

impl ImpedanceModel {
    pub fn new(coolant: CoolantParams) -> Self {
        Self { coolant }
    }

    /// Absolute liquid temperature at each profile point: scaled so the
    /// profile spans `temp_out - temp_in`, then shifted to start at `temp_in`.
    pub fn liquid_temperatures(&self, profile: &LiquidProfile) -> Vec<f64> {
        let p = profile.values();
        let c = &self.coolant;
        let last = p[p.len() - 1];
        let scaled: Vec<f64> = p.iter().map(|v| v * (c.temp_out - c.temp_in) / last).collect();
        let shift = c.temp_in - scaled[0];
        scaled.into_iter().map(|v| v + shift).collect()
    }

    /// Impedance of every region; `correction` shifts the region
    /// temperatures before the heat balance.
    pub fn impedances(
        &self,
        region_temps: &[f64],
        profile: &LiquidProfile,
        correction: Option<&HeatCorrection>,
    ) -> Result<Vec<f64>, ImpedanceError> {
        if region_temps.len() + 1 != profile.len() {
            return Err(ImpedanceError::ProfileLengthMismatch {
                regions: region_temps.len(),
                profile: profile.len(),
            });
        }
        let temps = match correction {
            Some(c) => c.apply(region_temps),
            None => region_temps.to_vec(),
        };
        let liquid = self.liquid_temperatures(profile);
        debug!("liquid temperatures after scaling = {liquid:?}");
        debug!(
            "flow rate = {} kg/s, heat capacity = {}",
            self.coolant.flow_rate_per_sec(),
            self.coolant.c_liquid
        );
        thermal_impedances(&temps, &liquid, self.coolant.c_liquid, self.coolant.flow_rate)
    }
}

/// Per-region impedance for absolute liquid temperatures `liquid`
/// (`region_temps.len() + 1` points) and a flow in kg/min.
pub fn thermal_impedances(
    region_temps: &[f64],
    liquid: &[f64],
    c_liquid: f64,
    flow_rate_per_min: f64,
) -> Result<Vec<f64>, ImpedanceError> {
    if region_temps.len() + 1 != liquid.len() {
        return Err(ImpedanceError::ProfileLengthMismatch {
            regions: region_temps.len(),
            profile: liquid.len(),
        });
    }
    let flow_per_sec = flow_rate_per_min / 60.0;
    let impedances = region_temps
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            // only one face of the stave absorbs the modelled heat
            let heat = (liquid[i] - liquid[i + 1]).abs() * c_liquid * 0.5 * flow_per_sec;
            if heat == 0.0 {
                return Err(ImpedanceError::ZeroHeatFlow { index: i });
            }
            let temp_diff = ((liquid[i] + liquid[i + 1]) / 2.0 - t).abs();
            Ok(temp_diff / heat)
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("impedances = {impedances:?}");
    Ok(impedances)
}

/// Impedance of the outbound pipe in parallel with the return pipe, whose
/// regions run in reverse order along the stave.
pub fn combine_parallel(outbound: &[f64], inbound: &[f64]) -> Result<Vec<f64>, ImpedanceError> {
    if outbound.len() != inbound.len() {
        return Err(ImpedanceError::PipeLengthMismatch {
            outbound: outbound.len(),
            inbound: inbound.len(),
        });
    }
    Ok(outbound
        .iter()
        .zip(inbound.iter().rev())
        .map(|(a, b)| 1.0 / (1.0 / a + 1.0 / b))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_form_fixture() {
        let liquid = [100.0, 80.0, 60.0, 40.0, 20.0, 0.0];
        let temps = [30.0; 5];
        let got = thermal_impedances(&temps, &liquid, 100.0, 60.0).unwrap();
        let expected: Vec<f64> = (0..5)
            .map(|i| {
                let heat = (liquid[i + 1] - liquid[i]).abs() * 100.0 * 0.5 * 1.0;
                ((liquid[i] + liquid[i + 1]) / 2.0 - 30.0).abs() / heat
            })
            .collect();
        assert_eq!(got, expected);
        assert_eq!(got, vec![0.06, 0.04, 0.02, 0.0, 0.02]);
    }

    #[test]
    fn length_mismatch_is_not_truncated() {
        let err = thermal_impedances(&[30.0; 4], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 1.0, 60.0)
            .unwrap_err();
        assert_eq!(
            err,
            ImpedanceError::ProfileLengthMismatch {
                regions: 4,
                profile: 6
            }
        );
    }

    #[test]
    fn flat_liquid_segment_has_no_heat() {
        let err = thermal_impedances(&[30.0, 30.0], &[20.0, 20.0, 22.0], 1.0, 60.0).unwrap_err();
        assert_eq!(err, ImpedanceError::ZeroHeatFlow { index: 0 });
    }

    fn model() -> ImpedanceModel {
        ImpedanceModel::new(CoolantParams {
            temp_in: 20.0,
            temp_out: 28.0,
            c_liquid: 1000.0,
            flow_rate: 1.2,
        })
    }

    #[test]
    fn profile_is_scaled_between_inlet_and_outlet() {
        let p = LiquidProfile::linear(4).unwrap();
        assert_eq!(model().liquid_temperatures(&p), vec![20.0, 22.0, 24.0, 26.0, 28.0]);
        let offset = LiquidProfile::new(vec![0.5, 1.0, 2.0]).unwrap();
        assert_eq!(model().liquid_temperatures(&offset), vec![20.0, 22.0, 26.0]);
    }

    #[test]
    fn model_impedances() {
        let p = LiquidProfile::linear(4).unwrap();
        let got = model().impedances(&[25.0; 4], &p, None).unwrap();
        let expected = [0.2, 0.1, 0.0, 0.1];
        for (g, e) in got.iter().zip(expected) {
            assert!((g - e).abs() < 1e-9, "{got:?}");
        }
        assert!(model().impedances(&[25.0; 3], &p, None).is_err());
    }

    #[test]
    fn parallel_combination_reverses_return_pipe() {
        let c = combine_parallel(&[1.0, 2.0], &[4.0, 2.0]).unwrap();
        assert_eq!(c, vec![1.0 / (1.0 + 0.5), 1.0 / (0.5 + 0.25)]);
        assert!(combine_parallel(&[1.0], &[1.0, 2.0]).is_err());
    }
}
