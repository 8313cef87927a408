use serde::Serialize;
use stave_thermal::config::impedance::{load_config, FaceConfig, ImpedanceToolConfig};
use stave_thermal::image::io::{load_temperature_csv, save_overlay_png, write_json_file};
use stave_thermal::image::ImageF32;
use stave_thermal::impedance::combine_parallel;
use stave_thermal::layout::populate;
use stave_thermal::mask::Mask;
use stave_thermal::stave::{Stave, StaveReport};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let image = load_temperature_csv(&config.input)?;
    println!(
        "Loaded {}x{} temperature grid from {}",
        image.w,
        image.h,
        config.input.display()
    );

    let mut faces = Vec::with_capacity(config.faces.len());
    let mut overlay: Option<(ImageF32, Mask)> = None;
    for face in &config.faces {
        let (summary, stave) = analyse_face(&config, face, image.clone())?;
        println!("Stave '{}' edges found at: {}", face.name, summary.stave.bbox);
        let (_, canvas) = overlay.get_or_insert_with(|| {
            let scaled = stave.image().clone();
            let mask = Mask::new(scaled.w, scaled.h);
            (scaled, mask)
        });
        stave.draw_edges(canvas).map_err(|e| e.to_string())?;
        for key in [&config.layout.large_key, &config.layout.small_key] {
            stave.draw_regions(canvas, key).map_err(|e| e.to_string())?;
        }
        faces.push(summary);
    }

    let report = ImpedanceReport {
        input: config.input.display().to_string(),
        faces,
    };
    write_json_file(&config.output.report_json, &report)?;
    println!("Saved impedances to {}", config.output.report_json.display());

    if let (Some(path), Some((scaled, mask))) = (&config.output.overlay_image, &overlay) {
        save_overlay_png(scaled, Some(mask), path)?;
        println!("Saved overlay image to {}", path.display());
    }
    Ok(())
}

fn analyse_face(
    config: &ImpedanceToolConfig,
    face: &FaceConfig,
    image: ImageF32,
) -> Result<(FaceReport, Stave), String> {
    let context = |e: stave_thermal::stave::StaveError| format!("face '{}': {e}", face.name);
    let mut stave = Stave::new(image, config.stave_params()?);
    stave.scale_image(config.scale).map_err(context)?;
    let w = face.window;
    stave
        .locate(w.x_min, w.x_max, w.y_min, w.y_max)
        .map_err(context)?;
    populate(&mut stave, &config.layout).map_err(context)?;

    let large = config.layout.large_key.as_str();
    let small = config.layout.small_key.as_str();
    let report = stave.report(&[large, small]).map_err(context)?;

    let small_impedances = &report
        .regions
        .iter()
        .find(|r| r.key == small)
        .ok_or_else(|| format!("face '{}': no small regions", face.name))?
        .impedances;
    let half = small_impedances.len() / 2;
    let combined = combine_parallel(&small_impedances[..half], &small_impedances[half..])
        .map_err(|e| format!("face '{}': {e}", face.name))?;

    Ok((
        FaceReport {
            name: face.name.clone(),
            stave: report,
            small_combined: combined,
        },
        stave,
    ))
}

fn usage() -> String {
    "Usage: stave_impedance <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FaceReport {
    name: String,
    stave: StaveReport,
    small_combined: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImpedanceReport {
    input: String,
    faces: Vec<FaceReport>,
}
