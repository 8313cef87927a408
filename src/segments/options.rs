use serde::{Deserialize, Serialize};

/// Parameters of the progressive Hough segment extractor.
///
/// Lengths and gaps are in pixels of the image being analysed; use
/// [`HoughOptions::with_scale`] when the image was resampled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughOptions {
    /// Distance resolution of the accumulator in pixels.
    pub rho_resolution: f32,
    /// Angular resolution of the accumulator in degrees.
    pub theta_resolution_deg: f32,
    /// Minimum accumulator votes for a line candidate.
    pub threshold: u32,
    /// Minimum accepted segment length in pixels.
    pub min_line_length: f32,
    /// Maximum gap between collinear edge pixels that still joins one segment.
    pub max_line_gap: f32,
    /// Maximum perpendicular distance of an edge pixel from a candidate line.
    pub max_distance_px: f32,
}

impl Default for HoughOptions {
    fn default() -> Self {
        Self {
            rho_resolution: 1.0,
            theta_resolution_deg: 1.0,
            threshold: 20,
            min_line_length: 10.0,
            max_line_gap: 5.0,
            max_distance_px: 1.0,
        }
    }
}

impl HoughOptions {
    /// Long, gap-tolerant lines: the stave's long edges, possibly interrupted
    /// by pipe features.
    pub fn long_lines() -> Self {
        Self {
            theta_resolution_deg: 0.18,
            threshold: 100,
            min_line_length: 200.0,
            max_line_gap: 175.0,
            ..Self::default()
        }
    }

    /// Short, tight lines: the stave's ends. The fine angular step keeps
    /// end candidates from the two pipe ends apart.
    pub fn short_lines() -> Self {
        Self {
            theta_resolution_deg: 0.018,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.threshold = ((self.threshold as f32) * scale).round().max(1.0) as u32;
        self.min_line_length *= scale;
        self.max_line_gap *= scale;
        self
    }
}
