use super::*;
use crate::mask::Mask;

fn line_mask(width: usize, height: usize, pixels: impl IntoIterator<Item = (usize, usize)>) -> Mask {
    let mut m = Mask::new(width, height);
    for (x, y) in pixels {
        m.set(x, y, true);
    }
    m
}

#[test]
fn finds_horizontal_segment() {
    let m = line_mask(120, 60, (10..=109).map(|x| (x, 30)));
    let segs = hough_segments(&m, &HoughOptions::default());
    assert_eq!(segs.len(), 1, "segments: {segs:?}");
    let s = &segs[0];
    assert_eq!(s.votes, 100);
    assert!((s.length() - 99.0).abs() < 1e-3);
    assert!(s.slope() < 1e-3);
    assert_eq!(s.midpoint(), [59.5, 30.0]);
}

#[test]
fn finds_vertical_segment_with_large_slope() {
    let m = line_mask(60, 80, (5..=45).map(|y| (20, y)));
    let segs = hough_segments(&m, &HoughOptions::default());
    assert_eq!(segs.len(), 1);
    assert!(segs[0].slope() > 1.0);
    assert_eq!(segs[0].midpoint()[0], 20.0);
}

#[test]
fn gap_larger_than_limit_splits_the_line() {
    let pixels = (0..40).chain(60..100).map(|x| (x, 10));
    let m = line_mask(100, 20, pixels);
    let opts = HoughOptions {
        threshold: 20,
        min_line_length: 10.0,
        max_line_gap: 5.0,
        ..HoughOptions::default()
    };
    let segs = hough_segments(&m, &opts);
    assert_eq!(segs.len(), 2);

    let bridged = HoughOptions {
        max_line_gap: 25.0,
        ..opts
    };
    let segs = hough_segments(&m, &bridged);
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].votes, 80);
}

#[test]
fn short_runs_are_rejected() {
    let m = line_mask(100, 20, (0..30).map(|x| (x, 5)));
    let segs = hough_segments(&m, &HoughOptions::long_lines());
    assert!(segs.is_empty());
}

#[test]
fn empty_mask_gives_no_segments() {
    let m = Mask::new(32, 32);
    assert!(hough_segments(&m, &HoughOptions::default()).is_empty());
}

#[test]
fn extraction_is_deterministic() {
    let mut pixels: Vec<(usize, usize)> = (10..90).map(|x| (x, 15)).collect();
    pixels.extend((10..90).map(|x| (x, 45)));
    pixels.extend((15..=45).map(|y| (10, y)));
    let m = line_mask(100, 60, pixels);
    let a = hough_segments(&m, &HoughOptions::default());
    let b = hough_segments(&m, &HoughOptions::default());
    assert_eq!(a.len(), b.len());
    for (sa, sb) in a.iter().zip(&b) {
        assert_eq!(sa.p0, sb.p0);
        assert_eq!(sa.p1, sb.p1);
        assert_eq!(sa.votes, sb.votes);
    }
}

#[test]
fn with_scale_shrinks_lengths() {
    let o = HoughOptions::long_lines().with_scale(0.5);
    assert_eq!(o.threshold, 50);
    assert_eq!(o.min_line_length, 100.0);
    assert_eq!(o.max_line_gap, 87.5);
}

#[test]
fn presets_resolve_fine_angles() {
    assert_eq!(HoughOptions::long_lines().theta_resolution_deg, 0.18);
    assert_eq!(HoughOptions::short_lines().theta_resolution_deg, 0.018);

    let m = line_mask(60, 80, (5..=45).map(|y| (20, y)));
    let segs = hough_segments(&m, &HoughOptions::short_lines());
    assert_eq!(segs.len(), 1, "segments: {segs:?}");
    assert_eq!(segs[0].votes, 41);
    assert_eq!(segs[0].midpoint(), [20.0, 25.0]);

    let m = line_mask(400, 60, (50..=349).map(|x| (x, 30)));
    let segs = hough_segments(&m, &HoughOptions::long_lines());
    assert_eq!(segs.len(), 1, "segments: {segs:?}");
    assert_eq!(segs[0].votes, 300);
}
