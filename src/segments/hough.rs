use super::options::HoughOptions;
use super::segment::{Segment, SegmentId};
use crate::mask::Mask;
use log::debug;
use std::time::Instant;

pub(super) struct HoughExtractor<'a> {
    options: &'a HoughOptions,
    points: Vec<[f32; 2]>,
    trig: Vec<(f32, f32)>,
    rho_offset: isize,
    n_rho: usize,
    consumed: Vec<bool>,
    segments: Vec<Segment>,
}

impl<'a> HoughExtractor<'a> {
    pub(super) fn new(edges: &Mask, options: &'a HoughOptions) -> Self {
        let points: Vec<[f32; 2]> = edges
            .points()
            .map(|(x, y)| [x as f32, y as f32])
            .collect();
        let theta_res_deg = options.theta_resolution_deg.max(1e-3);
        let n_theta = (180.0 / theta_res_deg).ceil().max(1.0) as usize;
        let trig = (0..n_theta)
            .map(|k| {
                let theta = (k as f32 * theta_res_deg).to_radians();
                (theta.cos(), theta.sin())
            })
            .collect();
        let rho_res = options.rho_resolution.max(1e-3);
        let diag = ((edges.w * edges.w + edges.h * edges.h) as f32).sqrt();
        let rho_offset = (diag / rho_res).ceil() as isize;
        let n_rho = 2 * rho_offset as usize + 1;
        let consumed = vec![false; points.len()];
        Self {
            options,
            points,
            trig,
            rho_offset,
            n_rho,
            consumed,
            segments: Vec::new(),
        }
    }

    pub(super) fn extract(mut self) -> Vec<Segment> {
        let t0 = Instant::now();
        let edge_pixels = self.points.len();
        if edge_pixels == 0 {
            debug!("hough: empty edge map");
            return Vec::new();
        }

        let acc = self.vote();
        let peaks = self.find_peaks(&acc);
        for &(_, cell) in &peaks {
            let theta_idx = cell / self.n_rho;
            let rho_idx = cell % self.n_rho;
            let rho = (rho_idx as isize - self.rho_offset) as f32 * self.options.rho_resolution;
            self.walk_line(self.trig[theta_idx], rho);
        }

        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "hough: edge_pixels={} peaks={} segments={} ({:.2} ms)",
            edge_pixels,
            peaks.len(),
            self.segments.len(),
            elapsed_ms
        );
        self.segments
    }

    fn rho_index(&self, p: [f32; 2], (c, s): (f32, f32)) -> Option<usize> {
        let rho = p[0] * c + p[1] * s;
        let idx = (rho / self.options.rho_resolution).round() as isize + self.rho_offset;
        (idx >= 0 && (idx as usize) < self.n_rho).then_some(idx as usize)
    }

    fn vote(&self) -> Vec<u32> {
        let mut acc = vec![0u32; self.trig.len() * self.n_rho];
        for &p in &self.points {
            for (t, &cs) in self.trig.iter().enumerate() {
                if let Some(r) = self.rho_index(p, cs) {
                    acc[t * self.n_rho + r] += 1;
                }
            }
        }
        acc
    }

    /// Local maxima of the accumulator above the threshold, strongest first.
    /// On plateaus only the cell with the lowest index survives.
    fn find_peaks(&self, acc: &[u32]) -> Vec<(u32, usize)> {
        let n_theta = self.trig.len();
        let mut peaks = Vec::new();
        for t in 0..n_theta {
            for r in 0..self.n_rho {
                let cell = t * self.n_rho + r;
                let v = acc[cell];
                if v < self.options.threshold.max(1) {
                    continue;
                }
                let mut is_peak = true;
                'neigh: for dt in -1isize..=1 {
                    for dr in -1isize..=1 {
                        if dt == 0 && dr == 0 {
                            continue;
                        }
                        let tn = t as isize + dt;
                        let rn = r as isize + dr;
                        if tn < 0 || rn < 0 || tn >= n_theta as isize || rn >= self.n_rho as isize {
                            continue;
                        }
                        let other_cell = tn as usize * self.n_rho + rn as usize;
                        let other = acc[other_cell];
                        if other > v || (other == v && other_cell < cell) {
                            is_peak = false;
                            break 'neigh;
                        }
                    }
                }
                if is_peak {
                    peaks.push((v, cell));
                }
            }
        }
        peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        peaks
    }

    /// Collect unused edge pixels along the line, split them at gaps and emit
    /// every run that is long enough.
    fn walk_line(&mut self, (c, s): (f32, f32), rho: f32) {
        let max_dist = self.options.max_distance_px.max(0.5);
        let mut along: Vec<(f32, usize)> = self
            .points
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed[*i])
            .filter(|(_, p)| (p[0] * c + p[1] * s - rho).abs() <= max_dist)
            .map(|(i, p)| (p[1] * c - p[0] * s, i))
            .collect();
        if along.len() < 2 {
            return;
        }
        along.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut start = 0usize;
        for k in 1..=along.len() {
            let split = k == along.len() || along[k].0 - along[k - 1].0 > self.options.max_line_gap;
            if !split {
                continue;
            }
            let run = &along[start..k];
            let span = run[run.len() - 1].0 - run[0].0;
            if span >= self.options.min_line_length {
                let p0 = self.points[run[0].1];
                let p1 = self.points[run[run.len() - 1].1];
                let id = SegmentId(self.segments.len() as u32);
                self.segments
                    .push(Segment::new(id, p0, p1, run.len() as u32));
                for &(_, i) in run {
                    self.consumed[i] = true;
                }
            }
            start = k;
        }
    }
}
