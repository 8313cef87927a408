use crate::impedance::{CoolantParams, LiquidProfile};
use crate::layout::{StaveLayout, FEA_PROFILE};
use crate::locate::LocatorParams;
use crate::stave::{CorrectionParams, StaveParams};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ImpedanceToolConfig {
    /// Temperature grid as CSV, one image row per line.
    pub input: PathBuf,
    /// Resampling factor applied before the stave search.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// One entry per stave face visible in the image.
    #[serde(default = "default_faces")]
    pub faces: Vec<FaceConfig>,
    pub coolant: CoolantConfig,
    #[serde(default)]
    pub locator: LocatorParams,
    /// End-of-stave correction coefficients; empty disables the correction.
    #[serde(default)]
    pub correction: CorrectionParams,
    #[serde(default)]
    pub layout: StaveLayout,
    #[serde(default = "default_line_thickness")]
    pub line_thickness: f64,
    pub output: ImpedanceOutputConfig,
}

fn default_scale() -> f64 {
    10.0
}

fn default_line_thickness() -> f64 {
    2.0
}

fn default_faces() -> Vec<FaceConfig> {
    vec![
        FaceConfig {
            name: "top".to_string(),
            window: SearchWindow {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 0.5,
            },
        },
        FaceConfig {
            name: "bottom".to_string(),
            window: SearchWindow {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.5,
                y_max: 1.0,
            },
        },
    ]
}

#[derive(Debug, Deserialize)]
pub struct FaceConfig {
    pub name: String,
    #[serde(default)]
    pub window: SearchWindow,
}

/// Relative search window within the image.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SearchWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CoolantConfig {
    #[serde(flatten)]
    pub params: CoolantParams,
    /// List of numbers or comma-separated string; the FEA profile when absent.
    #[serde(default, rename = "temperatureProfile", alias = "temperature_profile")]
    pub temperature_profile: Option<LiquidProfile>,
}

#[derive(Debug, Deserialize)]
pub struct ImpedanceOutputConfig {
    pub report_json: PathBuf,
    #[serde(default)]
    pub overlay_image: Option<PathBuf>,
}

impl ImpedanceToolConfig {
    pub fn stave_params(&self) -> Result<StaveParams, String> {
        let profile = match &self.coolant.temperature_profile {
            Some(p) => p.clone(),
            None => LiquidProfile::new(FEA_PROFILE.to_vec()).map_err(|e| e.to_string())?,
        };
        let correction = (!self.correction.dt_dq.is_empty()).then(|| self.correction.clone());
        Ok(StaveParams {
            coolant: self.coolant.params,
            profile,
            correction,
            locator: self.locator,
            line_thickness: self.line_thickness,
        })
    }
}

pub fn load_config(path: &Path) -> Result<ImpedanceToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
