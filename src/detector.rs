//! Keypoint orientation assignment pipeline.
//!
//! Wires gradient sampling, histogram construction, a-contrario mode
//! detection and per-mode orientation estimation behind a single params
//! struct. The pipeline is deterministic and shares no mutable state
//! across keypoints, so batches parallelize trivially (see the
//! `parallel` feature).

use serde::{Deserialize, Serialize};

use crate::builder::{orientation_histogram, HistogramParams, Keypoint};
use crate::gradient::GradientField;
use crate::histogram::CircularHistogram;
use crate::modes::{detect_modes, find_peaks, interval_orientation, HistogramPeak, ModeInterval};

/// Parameters of the orientation-assignment pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationParams {
    /// Histogram construction knobs.
    pub histogram: HistogramParams,
    /// Number of false detections tolerated by the a-contrario model.
    pub epsilon: f32,
    /// Relative threshold of the peak path, as a fraction of the highest
    /// bin.
    pub peak_threshold: f32,
}

impl Default for OrientationParams {
    fn default() -> Self {
        Self {
            histogram: HistogramParams::default(),
            epsilon: 1.0,
            peak_threshold: 0.8,
        }
    }
}

/// One detected orientation with its supporting interval.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ModeOrientation {
    /// The meaningful interval behind this orientation.
    pub interval: ModeInterval,
    /// Mass-weighted mean angle of the interval, in `(-π, π]`.
    pub angle: f32,
}

/// Per-keypoint detection report.
#[derive(Clone, Debug, Serialize)]
pub struct KeypointOrientations {
    /// The keypoint this report belongs to.
    pub keypoint: Keypoint,
    /// Number of pixels that contributed to the histogram.
    pub pixel_count: f32,
    /// Maximal meaningful modes with their orientations.
    pub modes: Vec<ModeOrientation>,
}

/// Orientation detector bundling the full pipeline.
pub struct OrientationDetector {
    params: OrientationParams,
}

impl OrientationDetector {
    pub fn new(params: OrientationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &OrientationParams {
        &self.params
    }

    /// Runs the a-contrario path for one keypoint on a precomputed
    /// gradient field.
    pub fn assign(&self, grad: &GradientField, keypoint: Keypoint) -> KeypointOrientations {
        let histo = orientation_histogram(grad, keypoint, &self.params.histogram);
        self.assign_from_histogram(&histo, keypoint)
    }

    /// A-contrario detection on an already-built histogram.
    pub fn assign_from_histogram(
        &self,
        histo: &CircularHistogram,
        keypoint: Keypoint,
    ) -> KeypointOrientations {
        let modes = detect_modes(histo, self.params.epsilon)
            .into_iter()
            .map(|interval| ModeOrientation {
                interval,
                angle: interval_orientation(histo, interval.start, interval.end),
            })
            .collect();
        KeypointOrientations {
            keypoint,
            pixel_count: histo.total_mass(),
            modes,
        }
    }

    /// Runs the peak (Lowe) path: a gradient-norm-weighted Gaussian-window
    /// histogram and relative-threshold local maxima.
    pub fn assign_peaks(&self, grad: &GradientField, keypoint: Keypoint) -> Vec<HistogramPeak> {
        find_peaks(
            &self.peak_histogram(grad, keypoint),
            self.params.peak_threshold,
        )
    }

    /// The histogram the peak path works on: norm-weighted, Gaussian
    /// window, same bin count.
    pub fn peak_histogram(&self, grad: &GradientField, keypoint: Keypoint) -> CircularHistogram {
        let params = HistogramParams {
            weight_by_norm: true,
            gaussian_window: true,
            ..self.params.histogram.clone()
        };
        orientation_histogram(grad, keypoint, &params)
    }

    /// Assigns orientations to every keypoint of a batch, in order.
    #[cfg(feature = "parallel")]
    pub fn assign_batch(
        &self,
        grad: &GradientField,
        keypoints: &[Keypoint],
    ) -> Vec<KeypointOrientations> {
        use rayon::prelude::*;
        keypoints
            .par_iter()
            .map(|&kp| self.assign(grad, kp))
            .collect()
    }

    /// Assigns orientations to every keypoint of a batch, in order.
    #[cfg(not(feature = "parallel"))]
    pub fn assign_batch(
        &self,
        grad: &GradientField,
        keypoints: &[Keypoint],
    ) -> Vec<KeypointOrientations> {
        keypoints.iter().map(|&kp| self.assign(grad, kp)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    fn ramp_gradient() -> GradientField {
        let mut img = ImageF32::new(48, 48);
        for y in 0..48 {
            for x in 0..48 {
                img.set(x, y, 4.0 * x as f32);
            }
        }
        GradientField::compute(&img)
    }

    #[test]
    fn constant_gradient_yields_one_mode_at_zero() {
        let grad = ramp_gradient();
        let detector = OrientationDetector::new(OrientationParams::default());
        let kp = Keypoint {
            x: 24,
            y: 24,
            radius: 8,
        };
        let result = detector.assign(&grad, kp);
        assert!(result.pixel_count > 0.0);
        assert_eq!(result.modes.len(), 1, "modes: {:?}", result.modes);
        let mode = &result.modes[0];
        assert!(mode.interval.log_nfa > 0.0);
        let bin_width = 2.0 * std::f32::consts::PI / 36.0;
        assert!(
            mode.angle.abs() <= bin_width,
            "angle {} not near 0",
            mode.angle
        );
    }

    #[test]
    fn batch_matches_individual_assignment() {
        let grad = ramp_gradient();
        let detector = OrientationDetector::new(OrientationParams::default());
        let keypoints = [
            Keypoint {
                x: 16,
                y: 16,
                radius: 6,
            },
            Keypoint {
                x: 30,
                y: 24,
                radius: 8,
            },
        ];
        let batch = detector.assign_batch(&grad, &keypoints);
        assert_eq!(batch.len(), 2);
        for (one, kp) in batch.iter().zip(keypoints) {
            let solo = detector.assign(&grad, kp);
            assert_eq!(one.modes.len(), solo.modes.len());
            assert_eq!(one.pixel_count, solo.pixel_count);
            for (a, b) in one.modes.iter().zip(&solo.modes) {
                assert_eq!(a.interval, b.interval);
                assert_eq!(a.angle, b.angle);
            }
        }
    }

    #[test]
    fn peak_path_agrees_on_the_dominant_orientation() {
        let grad = ramp_gradient();
        let detector = OrientationDetector::new(OrientationParams::default());
        let kp = Keypoint {
            x: 24,
            y: 24,
            radius: 4,
        };
        let peaks = detector.assign_peaks(&grad, kp);
        assert_eq!(peaks.len(), 1, "peaks: {peaks:?}");
        // θ = 0 lands in bin 18 of 36
        assert_eq!(peaks[0].bin, 18);
    }
}
