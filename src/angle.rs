//! Angle and modular-index utilities shared by the histogram and detector.

use std::f32::consts::PI;

/// True Euclidean modulus: the result is in `[0, |p|)` for every integer
/// `n`, including negative ones.
#[inline]
pub fn good_modulus(n: i32, p: i32) -> i32 {
    n.rem_euclid(p)
}

/// Folds an angle into `(-π, π]`.
#[inline]
pub fn wrap_to_pi(angle: f32) -> f32 {
    let t = angle.rem_euclid(2.0 * PI);
    if t > PI {
        t - 2.0 * PI
    } else {
        t
    }
}

/// Maps a gradient direction `theta = atan2(gy, gx)` to its bin in a
/// `bins`-wide circular histogram over `(-π, π]`.
///
/// The mapping is shifted by half a bin width so that `theta == π` lands in
/// bin 0 rather than a phantom bin `bins`.
#[inline]
pub fn orientation_bin(theta: f32, bins: usize) -> usize {
    let l = bins as f32;
    let bin = ((l / (2.0 * PI)) * (theta + PI + PI / l)).floor() as i32;
    good_modulus(bin, bins as i32) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn good_modulus_covers_negatives() {
        assert_eq!(good_modulus(-1, 5), 4);
        assert_eq!(good_modulus(-5, 5), 0);
        assert_eq!(good_modulus(-6, 5), 4);
        assert_eq!(good_modulus(7, 5), 2);
        assert_eq!(good_modulus(0, 5), 0);
        for n in -20..20 {
            let r = good_modulus(n, 7);
            assert!((0..7).contains(&r), "good_modulus({n}, 7) = {r}");
        }
    }

    #[test]
    fn wrap_to_pi_range() {
        assert!(approx_eq(wrap_to_pi(0.0), 0.0));
        assert!(approx_eq(wrap_to_pi(PI), PI));
        assert!(approx_eq(wrap_to_pi(-PI), PI));
        assert!(approx_eq(wrap_to_pi(3.0 * PI), PI));
        assert!(approx_eq(wrap_to_pi(1.5 * PI), -0.5 * PI));
        assert!(approx_eq(wrap_to_pi(-0.25 * PI), -0.25 * PI));
    }

    #[test]
    fn orientation_bin_shifts_by_half_a_bin() {
        // θ = π maps to bin 0, not bin L
        assert_eq!(orientation_bin(PI, 16), 0);
        assert_eq!(orientation_bin(-PI, 16), 0);
        // θ = 0 sits opposite bin 0
        assert_eq!(orientation_bin(0.0, 16), 8);
        assert_eq!(orientation_bin(PI - 0.3, 16), 15);
    }
}
