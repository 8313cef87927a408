use stave_thermal::image::ImageF32;

/// Uniform background with a uniform stave over the half-open spans
/// `xs = [x0, x1)` and `ys = [y0, y1)`.
pub fn stave_image(
    width: usize,
    height: usize,
    xs: (usize, usize),
    ys: (usize, usize),
    background: f32,
    stave: f32,
) -> ImageF32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(xs.0 < xs.1 && xs.1 <= width, "stave columns out of range");
    assert!(ys.0 < ys.1 && ys.1 <= height, "stave rows out of range");
    let mut img = ImageF32::filled(width, height, background);
    img.fill_rect(xs.0, xs.1, ys.0, ys.1, stave);
    img
}

/// 400x120 frame, stave at columns 50..349 and rows 40..65 (length:width
/// close to 11.957), background 18 and stave 30.
pub fn gradient_fixture() -> ImageF32 {
    stave_image(400, 120, (50, 349), (40, 65), 18.0, 30.0)
}

/// 640x480 frame with a 548x40 stave, background 20 and stave 40.
pub fn hough_fixture() -> ImageF32 {
    stave_image(640, 480, (46, 594), (220, 260), 20.0, 40.0)
}

/// Two staves stacked vertically, as seen when both faces are imaged.
pub fn two_face_fixture() -> ImageF32 {
    let mut img = stave_image(400, 240, (50, 349), (40, 65), 18.0, 30.0);
    img.fill_rect(52, 351, 160, 185, 29.0);
    img
}

/// Adds a deterministic +/- `amplitude` checker pattern.
pub fn with_checker_noise(mut img: ImageF32, amplitude: f32) -> ImageF32 {
    for y in 0..img.h {
        for x in 0..img.w {
            let v = img.get(x, y);
            let s = if (x + y) % 2 == 0 { amplitude } else { -amplitude };
            img.set(x, y, v + s);
        }
    }
    img
}

/// Serialise an image as headerless CSV, one row per line.
pub fn to_csv(img: &ImageF32) -> String {
    let mut out = String::new();
    for y in 0..img.h {
        let row: Vec<String> = (0..img.w).map(|x| format!("{}", img.get(x, y))).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}
