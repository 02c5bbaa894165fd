//! Orientation estimation for a detected interval.

use std::f32::consts::PI;

use crate::angle::wrap_to_pi;
use crate::histogram::CircularHistogram;

/// Mass-weighted mean angle of the bins in the circular interval `(a, b)`,
/// in `(-π, π]`.
///
/// Angles taken from the wrapped tail are unwrapped by +2π before
/// averaging so the mean is taken on a contiguous arc, then folded back.
/// The interval must carry positive mass; detected modes always do.
pub fn interval_orientation(histo: &CircularHistogram, a: usize, b: usize) -> f32 {
    let l = histo.bin_count();
    let mut theta = 0.0f64;
    if a <= b {
        for i in a..=b {
            theta += (histo.angle_of_bin(i as i32, false) * histo.value_at(i as i32)) as f64;
        }
    } else {
        for i in a..l {
            theta += (histo.angle_of_bin(i as i32, false) * histo.value_at(i as i32)) as f64;
        }
        for i in 0..=b {
            theta +=
                ((histo.angle_of_bin(i as i32, false) + 2.0 * PI) * histo.value_at(i as i32)) as f64;
        }
    }
    wrap_to_pi((theta / histo.range_sum(a, b) as f64) as f32)
}
