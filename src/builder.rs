//! Orientation-histogram construction around a keypoint.
//!
//! Accumulates the gradient orientations of a circular window into a
//! [`CircularHistogram`], with either a flat window of radius `r` or a
//! Gaussian window of σ = 1.5·r, optionally weighting each contribution by
//! the gradient norm. The histogram is renormalized so its total mass
//! equals the number of contributing pixels.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::angle::orientation_bin;
use crate::gradient::GradientField;
use crate::histogram::CircularHistogram;

/// Default gate on the gradient norm: anything at or below `3·√2` is
/// treated as 8-bit quantization noise with no usable orientation.
pub const DEFAULT_NOISE_THRESHOLD: f32 = 3.0 * std::f32::consts::SQRT_2;

/// Parameters of the orientation-histogram construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramParams {
    /// Number of orientation bins over `(-π, π]`.
    pub bins: usize,
    /// Weight each contribution by the gradient norm instead of a unit.
    pub weight_by_norm: bool,
    /// Use a Gaussian circular window of σ = 1.5·r instead of a flat
    /// window of radius r.
    pub gaussian_window: bool,
    /// Minimum gradient norm for a pixel to contribute when not weighting
    /// by norm.
    pub noise_threshold: f32,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            bins: 36,
            weight_by_norm: false,
            gaussian_window: false,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
        }
    }
}

/// Keypoint position and scale, in pixel units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: i32,
    pub y: i32,
    /// Window radius (the keypoint scale) in pixels.
    pub radius: i32,
}

/// Builds the orientation histogram of the window around `keypoint`.
///
/// Only pixels inside the circle (radius `r`, or `3σ` for the Gaussian
/// window) contribute, and the outermost one-pixel image border is always
/// excluded. After accumulation the histogram is rescaled so that its
/// total mass equals the contributing-pixel count; an empty window leaves
/// an all-zero histogram.
pub fn orientation_histogram(
    grad: &GradientField,
    keypoint: Keypoint,
    params: &HistogramParams,
) -> CircularHistogram {
    let mut histo = CircularHistogram::new(params.bins);
    let mut count = 0usize;

    let sigma = if params.gaussian_window {
        Some(1.5 * keypoint.radius as f32)
    } else {
        None
    };
    let reach = match sigma {
        Some(s) => (3.0 * s) as i32,
        None => keypoint.radius,
    };
    let radius_sq = match sigma {
        Some(s) => 9.0 * s * s,
        None => (keypoint.radius * keypoint.radius) as f32,
    };

    let nx = grad.width() as i32;
    let ny = grad.height() as i32;
    let (x0, y0) = (keypoint.x, keypoint.y);

    for i in (x0 - reach).max(1)..=(x0 + reach).min(nx - 2) {
        for j in (y0 - reach).max(1)..=(y0 + reach).min(ny - 2) {
            let dist_sq = ((i - x0) * (i - x0) + (j - y0) * (j - y0)) as f32;
            if dist_sq > radius_sq {
                continue;
            }
            let norm = grad.magnitude(i as usize, j as usize);
            if !params.weight_by_norm && norm <= params.noise_threshold {
                continue;
            }
            count += 1;
            let bin = orientation_bin(grad.orientation(i as usize, j as usize), params.bins);
            let mut weight = if params.weight_by_norm { norm } else { 1.0 };
            if let Some(s) = sigma {
                weight *= (-dist_sq / (2.0 * s * s)).exp();
            }
            histo
                .increment(bin, weight)
                .expect("orientation_bin reduces modulo the bin count");
        }
    }

    let mass = histo.total_mass();
    if mass > 0.0 {
        histo.scale(count as f32 / mass);
    }
    debug!(
        "orientation histogram at ({}, {}): {} contributing pixels, {} bins, mass {:.3}",
        keypoint.x,
        keypoint.y,
        count,
        params.bins,
        histo.total_mass()
    );
    histo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    /// Diagonal ramp: constant gradient everywhere away from the border.
    fn ramp_gradient(w: usize, h: usize, kx: f32, ky: f32) -> GradientField {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, kx * x as f32 + ky * y as f32);
            }
        }
        GradientField::compute(&img)
    }

    fn interior_circle_count(kp: Keypoint, w: i32, h: i32) -> usize {
        let mut count = 0;
        for i in 1..=(w - 2) {
            for j in 1..=(h - 2) {
                if (i - kp.x).pow(2) + (j - kp.y).pow(2) <= kp.radius * kp.radius {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn flat_window_mass_equals_pixel_count() {
        let grad = ramp_gradient(32, 32, 4.0, 0.0);
        let kp = Keypoint {
            x: 16,
            y: 16,
            radius: 6,
        };
        let histo = orientation_histogram(&grad, kp, &HistogramParams::default());
        let expected = interior_circle_count(kp, 32, 32) as f32;
        assert!(
            (histo.total_mass() - expected).abs() < 1e-3,
            "mass {} expected {}",
            histo.total_mass(),
            expected
        );
        // all the mass lands in the single bin of θ = 0
        assert!((histo.value_at(18) - expected).abs() < 1e-3);
    }

    #[test]
    fn border_pixels_never_contribute() {
        let grad = ramp_gradient(16, 16, 4.0, 0.0);
        // window overflowing the image: clamped to the interior
        let kp = Keypoint {
            x: 1,
            y: 1,
            radius: 5,
        };
        let histo = orientation_histogram(&grad, kp, &HistogramParams::default());
        let expected = interior_circle_count(kp, 16, 16) as f32;
        assert!((histo.total_mass() - expected).abs() < 1e-3);
    }

    #[test]
    fn noise_gate_drops_weak_gradients() {
        // gradient norm 2k = 4 stays below the 3√2 gate
        let grad = ramp_gradient(32, 32, 2.0, 0.0);
        let kp = Keypoint {
            x: 16,
            y: 16,
            radius: 6,
        };
        let histo = orientation_histogram(&grad, kp, &HistogramParams::default());
        assert_eq!(histo.total_mass(), 0.0);

        // norm weighting bypasses the gate
        let params = HistogramParams {
            weight_by_norm: true,
            ..HistogramParams::default()
        };
        let histo = orientation_histogram(&grad, kp, &params);
        assert!(histo.total_mass() > 0.0);

        // and a lowered gate lets the same gradients through
        let params = HistogramParams {
            noise_threshold: 3.0,
            ..HistogramParams::default()
        };
        let histo = orientation_histogram(&grad, kp, &params);
        assert!((histo.total_mass() - interior_circle_count(kp, 32, 32) as f32).abs() < 1e-3);
    }

    #[test]
    fn norm_weighting_renormalizes_to_count() {
        let grad = ramp_gradient(32, 32, 4.0, 4.0);
        let kp = Keypoint {
            x: 16,
            y: 16,
            radius: 5,
        };
        let params = HistogramParams {
            weight_by_norm: true,
            ..HistogramParams::default()
        };
        let histo = orientation_histogram(&grad, kp, &params);
        let expected = interior_circle_count(kp, 32, 32) as f32;
        assert!((histo.total_mass() - expected).abs() < 1e-3);
    }

    #[test]
    fn gaussian_window_renormalizes_to_count() {
        let grad = ramp_gradient(64, 64, 4.0, 0.0);
        let kp = Keypoint {
            x: 32,
            y: 32,
            radius: 2,
        };
        let params = HistogramParams {
            gaussian_window: true,
            ..HistogramParams::default()
        };
        let histo = orientation_histogram(&grad, kp, &params);
        let sigma = 1.5 * kp.radius as f32;
        let reach = (3.0 * sigma) as i32;
        let mut count = 0;
        for i in (kp.x - reach).max(1)..=(kp.x + reach).min(62) {
            for j in (kp.y - reach).max(1)..=(kp.y + reach).min(62) {
                if ((i - kp.x).pow(2) + (j - kp.y).pow(2)) as f32 <= 9.0 * sigma * sigma {
                    count += 1;
                }
            }
        }
        assert!((histo.total_mass() - count as f32).abs() < 1e-2);
    }

    #[test]
    fn empty_window_leaves_zero_histogram() {
        let grad = GradientField::compute(&ImageF32::new(32, 32));
        let kp = Keypoint {
            x: 16,
            y: 16,
            radius: 5,
        };
        let histo = orientation_histogram(&grad, kp, &HistogramParams::default());
        assert_eq!(histo.total_mass(), 0.0);
        assert!(histo.bins().iter().all(|&v| v == 0.0));
    }
}
