use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Identifier of a segment within one extraction pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u32);

/// Line segment produced by the Hough extractor, endpoints in pixel `(x, y)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    /// Number of edge pixels supporting the segment.
    pub votes: u32,
    #[serde(skip)]
    length: OnceCell<f32>,
}

impl Segment {
    pub fn new(id: SegmentId, p0: [f32; 2], p1: [f32; 2], votes: u32) -> Self {
        Self {
            id,
            p0,
            p1,
            votes,
            length: OnceCell::new(),
        }
    }

    pub fn midpoint(&self) -> [f32; 2] {
        [
            (self.p0[0] + self.p1[0]) * 0.5,
            (self.p0[1] + self.p1[1]) * 0.5,
        ]
    }

    fn compute_length(&self) -> f32 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        *self.length.get_or_init(|| self.compute_length())
    }

    /// `|dy / dx|` with a small guard on `dx`; vertical segments give a large value.
    pub fn slope(&self) -> f32 {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        (dy / (dx.abs() + 1e-4)).abs()
    }
}
