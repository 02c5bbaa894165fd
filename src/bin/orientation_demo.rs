use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use orientation_detector::config::{load_config, DemoConfig, DemoOutputConfig};
use orientation_detector::image::io::{load_grayscale_image, save_histogram_txt, write_json_file};
use orientation_detector::image::ImageF32;
use orientation_detector::{
    find_peaks, orientation_histogram, GradientField, HistogramPeak, Keypoint,
    KeypointOrientations, OrientationDetector, OrientationParams,
};

#[derive(Serialize)]
struct DemoReport<'a> {
    modes: &'a KeypointOrientations,
    peaks: &'a [HistogramPeak],
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = parse_args()?;

    let gray = load_grayscale_image(&config.input)?;
    let image = ImageF32::from_u8(&gray.as_view());
    let grad = GradientField::compute(&image);

    let detector = OrientationDetector::new(config.params.clone());
    let keypoint = config.keypoint;

    // a-contrario path
    let histo = orientation_histogram(&grad, keypoint, &detector.params().histogram);
    if let Some(path) = &config.output.histogram_txt {
        save_histogram_txt(&histo, path)?;
    }
    if let Some(path) = &config.output.pixel_count_txt {
        fs::write(path, format!("{}\n", histo.total_mass()))
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    }
    let result = detector.assign_from_histogram(&histo, keypoint);
    println!(
        "a-contrario: {} mode(s) from {} contributing pixels",
        result.modes.len(),
        result.pixel_count
    );
    for mode in &result.modes {
        println!(
            "  [{},{}] ; {} ; {}",
            mode.interval.start, mode.interval.end, mode.angle, mode.interval.log_nfa
        );
    }
    if let Some(path) = &config.output.modes_txt {
        let mut text = String::new();
        for mode in &result.modes {
            text.push_str(&format!(
                "[{},{}] ; {} ; {}\n",
                mode.interval.start, mode.interval.end, mode.angle, mode.interval.log_nfa
            ));
        }
        fs::write(path, text).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    }

    // peak (Lowe) path
    let peak_histo = detector.peak_histogram(&grad, keypoint);
    if let Some(path) = &config.output.peaks_histogram_txt {
        save_histogram_txt(&peak_histo, path)?;
    }
    let peaks = find_peaks(&peak_histo, detector.params().peak_threshold);
    println!("peaks: {} local maxima", peaks.len());
    for peak in &peaks {
        println!(
            "  [{},{}] ; {} ; {}",
            peak.bin, peak.bin, peak.angle, peak.prominence
        );
    }
    if let Some(path) = &config.output.peaks_txt {
        let mut text = String::new();
        for peak in &peaks {
            text.push_str(&format!(
                "[{},{}] ; {} ; {}\n",
                peak.bin, peak.bin, peak.angle, peak.prominence
            ));
        }
        fs::write(path, text).map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    }

    if let Some(path) = &config.output.report_json {
        write_json_file(
            path,
            &DemoReport {
                modes: &result,
                peaks: &peaks,
            },
        )?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

fn parse_args() -> Result<DemoConfig, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.len() {
        1 => load_config(Path::new(&args[0])),
        5 | 6 => {
            let parse_int = |s: &String, name: &str| {
                s.parse::<i32>()
                    .map_err(|e| format!("Invalid {name} '{s}': {e}"))
            };
            let mut params = OrientationParams::default();
            params.histogram.bins = parse_int(&args[4], "bin count")? as usize;
            if let Some(flag) = args.get(5) {
                params.histogram.weight_by_norm = flag != "0";
            }
            Ok(DemoConfig {
                input: PathBuf::from(&args[0]),
                keypoint: Keypoint {
                    x: parse_int(&args[1], "x")?,
                    y: parse_int(&args[2], "y")?,
                    radius: parse_int(&args[3], "radius")?,
                },
                params,
                output: DemoOutputConfig {
                    histogram_txt: Some(PathBuf::from("histogram_ac.txt")),
                    pixel_count_txt: Some(PathBuf::from("pixel_count_ac.txt")),
                    modes_txt: Some(PathBuf::from("modes_ac.txt")),
                    peaks_histogram_txt: Some(PathBuf::from("histogram_peaks.txt")),
                    peaks_txt: Some(PathBuf::from("peaks.txt")),
                    report_json: None,
                },
            })
        }
        _ => Err(
            "Usage: orientation_demo <config.json>\n       \
             orientation_demo <image> <x> <y> <radius> <bins> [weight_by_norm]"
                .to_string(),
        ),
    }
}
