//! Circular histogram over a fixed number of bins spanning `(-π, π]`.
//!
//! The histogram owns a dense array of `L` non-negative bin weights and
//! tracks the total accumulated mass `M`. Bin indices are always
//! interpreted modulo `L`: every integer resolves to a bin via true
//! Euclidean reduction, and intervals may wrap past the last bin back to
//! bin 0.

use std::f32::consts::PI;
use std::io::{self, Write};

use thiserror::Error;

use crate::angle::good_modulus;

/// Attempt to add weight to a bin outside `[0, L)`.
///
/// This marks a caller bug, not a recoverable condition; the write is
/// never performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bin index {bin} outside histogram range [0, {bins})")]
pub struct InvalidBinIndex {
    /// The offending index.
    pub bin: usize,
    /// The histogram's bin count.
    pub bins: usize,
}

/// Fixed-bin circular accumulator of orientation weights.
#[derive(Clone, Debug)]
pub struct CircularHistogram {
    bins: Vec<f32>,
    mass: f32,
}

impl CircularHistogram {
    /// Creates an empty histogram with `num_bins` bins.
    pub fn new(num_bins: usize) -> Self {
        assert!(num_bins > 0, "circular histogram requires at least one bin");
        Self {
            bins: vec![0.0; num_bins],
            mass: 0.0,
        }
    }

    /// Number of bins `L`.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Number of distinct circular intervals, `L·(L−1)+1`.
    ///
    /// This is the Bonferroni-style number-of-tests term penalizing the
    /// a-contrario model for considering every interval.
    #[inline]
    pub fn number_of_tests(&self) -> usize {
        let l = self.bins.len();
        l * (l - 1) + 1
    }

    /// Total accumulated mass `M`.
    #[inline]
    pub fn total_mass(&self) -> f32 {
        self.mass
    }

    /// All bin values in index order.
    #[inline]
    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    /// Bin value at `i mod L`; any integer index resolves.
    #[inline]
    pub fn value_at(&self, i: i32) -> f32 {
        self.bins[good_modulus(i, self.bins.len() as i32) as usize]
    }

    /// Sum of the bins over the circular interval from `a` to `b`
    /// inclusive, wrapping past the last bin when `b < a`.
    pub fn range_sum(&self, a: usize, b: usize) -> f32 {
        if a <= b {
            self.bins[a..=b].iter().sum()
        } else {
            self.bins[a..].iter().sum::<f32>() + self.bins[..=b].iter().sum::<f32>()
        }
    }

    /// Adds `weight` to `bin` and to the total mass.
    pub fn increment(&mut self, bin: usize, weight: f32) -> Result<(), InvalidBinIndex> {
        if bin >= self.bins.len() {
            return Err(InvalidBinIndex {
                bin,
                bins: self.bins.len(),
            });
        }
        self.bins[bin] += weight;
        self.mass += weight;
        Ok(())
    }

    /// Multiplies every bin and the total mass by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.bins {
            *v *= factor;
        }
        self.mass *= factor;
    }

    /// Largest bin value, floored at zero.
    pub fn max_value(&self) -> f32 {
        self.bins.iter().fold(0.0f32, |m, &v| m.max(v))
    }

    /// Angle of `bin` in `(-π, π]`; the index resolves modulo `L`.
    ///
    /// With `refine`, a parabola is fitted through the bin and its two
    /// circular neighbours and the sub-bin vertex is returned. When the
    /// neighbour triple is degenerate (flat or inverted, non-finite
    /// vertex) the plain bin center is used instead.
    pub fn angle_of_bin(&self, bin: i32, refine: bool) -> f32 {
        let l = self.bins.len();
        let bin = good_modulus(bin, l as i32);
        let mut x = bin as f32;
        if refine {
            let left = self.value_at(bin - 1);
            let center = self.value_at(bin);
            let right = self.value_at(bin + 1);
            let offset = 0.5 * (left - right) / (-left + 2.0 * center - right);
            if offset.is_finite() {
                x = bin as f32 - offset;
            }
        }
        -PI + x * (2.0 * PI / l as f32)
    }

    /// Writes all bin values, space separated, in index order.
    pub fn dump<W: Write>(&self, mut dst: W) -> io::Result<()> {
        for (i, v) in self.bins.iter().enumerate() {
            if i > 0 {
                write!(dst, " ")?;
            }
            write!(dst, "{v}")?;
        }
        writeln!(dst)
    }
}
