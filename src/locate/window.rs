use super::LocateError;
use serde::Serialize;
use std::fmt;

/// Half-open absolute pixel window `[x0, x1) × [y0, y1)` of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Window {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl Window {
    /// The whole `width × height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x0: 0,
            x1: width,
            y0: 0,
            y1: height,
        }
    }

    /// Convert relative bounds to pixels by truncating `rel * extent`.
    pub fn from_relative(
        rel_x_min: f64,
        rel_x_max: f64,
        rel_y_min: f64,
        rel_y_max: f64,
        width: usize,
        height: usize,
    ) -> Result<Self, LocateError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        let ordered = rel_x_min <= rel_x_max && rel_y_min <= rel_y_max;
        if !ordered || ![rel_x_min, rel_x_max, rel_y_min, rel_y_max].into_iter().all(in_unit) {
            return Err(LocateError::InvalidWindow {
                x_min: rel_x_min,
                x_max: rel_x_max,
                y_min: rel_y_min,
                y_max: rel_y_max,
            });
        }
        Ok(Self {
            x0: (rel_x_min * width as f64) as usize,
            x1: (rel_x_max * width as f64) as usize,
            y0: (rel_y_min * height as f64) as usize,
            y1: (rel_y_max * height as f64) as usize,
        })
    }

    pub fn width(&self) -> usize {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}) x [{}..{})", self.x0, self.x1, self.y0, self.y1)
    }
}

/// Stave bounding box in absolute pixels; `x` runs along the stave length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BBox {
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

impl BBox {
    /// Build a box from window-relative edges, rejecting degenerate geometry.
    pub(crate) fn from_window_edges(
        window: &Window,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
    ) -> Result<Self, LocateError> {
        if !(left < right && top < bottom) {
            return Err(LocateError::not_found(
                window,
                format!("degenerate box left={left} right={right} top={top} bottom={bottom}"),
            ));
        }
        Ok(Self {
            x_left: left + window.x0 as f64,
            x_right: right + window.x0 as f64,
            y_top: top + window.y0 as f64,
            y_bottom: bottom + window.y0 as f64,
        })
    }

    pub fn length(&self) -> f64 {
        self.x_right - self.x_left
    }

    pub fn width(&self) -> f64 {
        self.y_bottom - self.y_top
    }

    pub fn ratio(&self) -> f64 {
        self.length() / self.width()
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.x_left, self.x_right, self.y_top, self.y_bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_window_truncates() {
        let w = Window::from_relative(0.1, 0.95, 0.25, 0.75, 333, 101).unwrap();
        assert_eq!(w, Window { x0: 33, x1: 316, y0: 25, y1: 75 });
        assert_eq!(w.width(), 283);
        assert_eq!(w.height(), 50);
    }

    #[test]
    fn inverted_or_out_of_range_window_is_rejected() {
        assert!(matches!(
            Window::from_relative(0.6, 0.4, 0.0, 1.0, 100, 100),
            Err(LocateError::InvalidWindow { .. })
        ));
        assert!(matches!(
            Window::from_relative(0.0, 1.0, 0.7, 0.2, 100, 100),
            Err(LocateError::InvalidWindow { .. })
        ));
        assert!(matches!(
            Window::from_relative(-0.1, 1.0, 0.0, 1.0, 100, 100),
            Err(LocateError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn bbox_is_offset_by_window_origin() {
        let w = Window { x0: 10, x1: 110, y0: 5, y1: 55 };
        let b = BBox::from_window_edges(&w, 2.0, 62.0, 3.0, 8.0).unwrap();
        assert_eq!(b.x_left, 12.0);
        assert_eq!(b.y_bottom, 13.0);
        assert_eq!(b.length(), 60.0);
        assert_eq!(b.width(), 5.0);
        assert_eq!(b.ratio(), 12.0);
        assert!(BBox::from_window_edges(&w, 5.0, 5.0, 0.0, 1.0).is_err());
    }
}
