//! Lowe-style peak selection on a gradient-norm-weighted histogram.
//!
//! The classic SIFT alternative to the a-contrario detector: keep every
//! strict circular local maximum reaching a fixed fraction of the
//! histogram's highest bin.

use serde::Serialize;

use crate::histogram::CircularHistogram;

/// One local maximum of the histogram.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct HistogramPeak {
    /// Bin holding the local maximum.
    pub bin: usize,
    /// Parabola-refined orientation angle in `(-π, π]`.
    pub angle: f32,
    /// Peak value relative to the histogram maximum, in `(0, 1]`.
    pub prominence: f32,
}

/// Finds every bin that is a strict local maximum over its circular
/// neighbours and exceeds `relative_threshold` times the histogram
/// maximum. An all-zero histogram has no peaks.
pub fn find_peaks(histo: &CircularHistogram, relative_threshold: f32) -> Vec<HistogramPeak> {
    let max = histo.max_value();
    if max <= 0.0 {
        return Vec::new();
    }
    let mut peaks = Vec::new();
    for bin in 0..histo.bin_count() {
        let v = histo.value_at(bin as i32);
        if v > relative_threshold * max
            && v > histo.value_at(bin as i32 - 1)
            && v > histo.value_at(bin as i32 + 1)
        {
            peaks.push(HistogramPeak {
                bin,
                angle: histo.angle_of_bin(bin as i32, true),
                prominence: v / max,
            });
        }
    }
    peaks
}
