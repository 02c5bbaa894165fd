//! A-contrario detection of meaningful intervals in a circular histogram.
//!
//! Every ordered bin pair `(a, b)` is scored by the Kullback–Leibler
//! divergence between the interval's observed mass fraction and its
//! expected fraction under a uniform null model. Intervals whose score
//! exceeds `ln(N/ε)/M` are meaningful (modes above the expectation, gaps
//! below). Intervals containing a meaningful gap are then erased, and
//! nested modes are suppressed until only maximal detections remain.

use log::debug;
use serde::Serialize;

use super::interval::{for_each_container, for_each_proper_subinterval, uniform_fraction};
use super::matrix::SquareMatrix;
use crate::histogram::CircularHistogram;

/// Classification of one circular interval during detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    /// No significant deviation from the uniform null model.
    None,
    /// Significantly less mass than expected.
    Gap,
    /// Significant mode dominated by a nested or enclosing one.
    Suppressed,
    /// Maximal significant mode.
    Mode,
}

impl Mark {
    /// Gap-free significant intervals, suppressed or not.
    #[inline]
    fn is_mode_like(self) -> bool {
        matches!(self, Mark::Suppressed | Mark::Mode)
    }
}

/// One detected orientation mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ModeInterval {
    /// First bin of the interval.
    pub start: usize,
    /// Last bin of the interval, inclusive; wraps when smaller than `start`.
    pub end: usize,
    /// Approximate −log10 of the number of false alarms; positive means
    /// significant. This is the first-order large-deviations approximation
    /// `−log10(N) + M·h/ln 10`, not the exact binomial tail.
    pub log_nfa: f32,
}

/// Kullback–Leibler divergence between the observed mass fraction `r` and
/// the expected fraction `p` of one interval.
///
/// `r ≥ 1` is taken as the exact limit `−ln p`. A zero `r` leaves the
/// `0·ln 0` indeterminate as NaN; the scoring pass treats any non-finite
/// value as no signal, so an interval without mass is never meaningful.
pub fn relative_entropy(r: f32, p: f32) -> f32 {
    if r >= 1.0 {
        return -p.ln();
    }
    r * (r / p).ln() + (1.0 - r) * ((1.0 - r) / (1.0 - p)).ln()
}

/// Detects the maximal meaningful intervals of `histo`.
///
/// `epsilon` is the number of false detections tolerated over all
/// `L·(L−1)+1` candidate intervals under the uniform null model. An empty
/// histogram yields no modes.
pub fn detect_modes(histo: &CircularHistogram, epsilon: f32) -> Vec<ModeInterval> {
    let mass = histo.total_mass();
    if mass <= 0.0 {
        return Vec::new();
    }

    let l = histo.bin_count();
    let mut marks = SquareMatrix::filled(l, Mark::None);
    let mut entropy = SquareMatrix::filled(l, 0.0f32);

    score_intervals(histo, epsilon, &mut marks, &mut entropy);
    erase_gap_containers(l, &mut marks);
    suppress_nested_modes(l, &mut marks, &entropy);

    let log_tests = (histo.number_of_tests() as f32).log10();
    let mut modes = Vec::new();
    for a in 0..l {
        for b in 0..l {
            if marks.get(a, b) == Mark::Mode {
                modes.push(ModeInterval {
                    start: a,
                    end: b,
                    log_nfa: -log_tests + mass * entropy.get(a, b) / std::f32::consts::LN_10,
                });
            }
        }
    }
    debug!(
        "mode detection over {} bins (mass {:.3}, epsilon {}): {} maximal modes",
        l,
        mass,
        epsilon,
        modes.len()
    );
    modes
}

/// Scores every ordered bin pair and marks meaningful intervals and gaps.
fn score_intervals(
    histo: &CircularHistogram,
    epsilon: f32,
    marks: &mut SquareMatrix<Mark>,
    entropy: &mut SquareMatrix<f32>,
) {
    let l = histo.bin_count();
    let mass = histo.total_mass();
    let threshold = (histo.number_of_tests() as f32 / epsilon).ln() / mass;

    for a in 0..l {
        for b in 0..l {
            let observed = histo.range_sum(a, b) / mass;
            let expected = uniform_fraction(a, b, l);
            let h = relative_entropy(observed, expected);
            entropy.set(a, b, h);
            if h.is_finite() && h > threshold {
                marks.set(
                    a,
                    b,
                    if observed > expected {
                        Mark::Mode
                    } else {
                        Mark::Gap
                    },
                );
            }
        }
    }
}

/// Erases every interval containing a meaningful gap, the gap itself
/// included: an interval straddling a gap cannot be a mode.
fn erase_gap_containers(l: usize, marks: &mut SquareMatrix<Mark>) {
    for a in 0..l {
        for b in 0..l {
            if marks.get(a, b) == Mark::Gap {
                for_each_container(a, b, l, |i, j| marks.set(i, j, Mark::None));
            }
        }
    }
}

/// Keeps only maximal modes: each candidate is compared against every
/// mode-like interval strictly inside it, and whichever side of the pair
/// has the lower entropy is suppressed.
///
/// Suppressed intervals keep participating in later comparisons, so the
/// outcome depends on the scan order: ascending `a` with the non-wrapping
/// `b` half first, then sub-starts ascending and sub-ends descending.
fn suppress_nested_modes(l: usize, marks: &mut SquareMatrix<Mark>, entropy: &SquareMatrix<f32>) {
    for a in 0..l {
        for b in (a..l).chain(0..a) {
            if marks.get(a, b) != Mark::Mode {
                continue;
            }
            let outer = entropy.get(a, b);
            for_each_proper_subinterval(a, b, l, |i, j| {
                if marks.get(i, j).is_mode_like() {
                    if entropy.get(i, j) < outer {
                        marks.set(i, j, Mark::Suppressed);
                    } else {
                        marks.set(a, b, Mark::Suppressed);
                    }
                }
            });
        }
    }
}
