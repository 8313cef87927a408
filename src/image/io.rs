//! I/O helpers for temperature grids, preview images and JSON.
//!
//! - `load_temperature_csv`: read a numeric CSV export of a thermal frame.
//! - `save_overlay_png`: write a min/max-normalised grayscale preview with an
//!   optional overlay mask painted black.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView};
use crate::mask::Mask;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a headerless numeric CSV file into an image; one CSV row per image row.
pub fn load_temperature_csv(path: &Path) -> Result<ImageF32, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;

    let mut rows = Vec::new();
    for (y, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| format!("Failed to read {} row {y}: {e}", path.display()))?;
        let row = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| {
                field.parse::<f32>().map_err(|e| {
                    format!("Invalid sample '{field}' in {} row {y}: {e}", path.display())
                })
            })
            .collect::<Result<Vec<f32>, String>>()?;
        rows.push(row);
    }
    ImageF32::from_rows(rows).map_err(|e| format!("Malformed grid in {}: {e}", path.display()))
}

/// Save a float image as grayscale PNG, stretching `[min, max]` to `[0, 255]`.
/// Pixels set in `overlay` (if provided and of matching size) are painted black.
pub fn save_overlay_png(
    image: &ImageF32,
    overlay: Option<&Mask>,
    path: &Path,
) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let (lo, hi) = image.min_max().ok_or("Cannot save an empty image")?;
    let span = if hi > lo { hi - lo } else { 1.0 };
    let overlay = overlay.filter(|m| m.w == image.w && m.h == image.h);
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        let row = image.row(y);
        for (x, &px) in row.iter().enumerate() {
            let painted = overlay.is_some_and(|m| m.get(x, y));
            let v = if painted {
                0.0
            } else {
                ((px - lo) / span * 255.0).clamp(0.0, 255.0)
            };
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_grid_round_trips_through_loader() {
        let dir = std::env::temp_dir().join(format!("stave-io-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.csv");
        fs::write(&path, "18.0, 18.5,19\n20,21.25,22\n").unwrap();
        let img = load_temperature_csv(&path).unwrap();
        assert_eq!((img.w, img.h), (3, 2));
        assert_eq!(img.get(1, 1), 21.25);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn csv_loader_reports_bad_samples() {
        let dir = std::env::temp_dir().join(format!("stave-io-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frame.csv");
        fs::write(&path, "1,2\n3,abc\n").unwrap();
        let err = load_temperature_csv(&path).unwrap_err();
        assert!(err.contains("abc"), "{err}");
        fs::remove_dir_all(&dir).ok();
    }
}
