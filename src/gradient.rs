//! Central-difference image gradients.
//!
//! Computes per-pixel `gx`, `gy` and the Euclidean magnitude for a
//! single-channel float image in one pass, using the plain
//! 4-neighbourhood central-difference stencil.

use crate::image::{ImageF32, ImageView, ImageViewMut};

/// Per-pixel gradient buffers for a single-channel image.
///
/// `gx = I(x+1, y) − I(x−1, y)` and `gy = I(x, y−1) − I(x, y+1)`, so
/// `atan2(gy, gx)` is the trigonometric orientation with the y axis
/// pointing up. The outermost one-pixel border has no valid stencil and
/// stays zero; consumers must not sample it.
#[derive(Clone, Debug)]
pub struct GradientField {
    /// Horizontal derivative
    pub gx: ImageF32,
    /// Vertical derivative (upward)
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

impl GradientField {
    /// Compute central-difference gradients over the whole image.
    pub fn compute(l: &ImageF32) -> Self {
        let w = l.w;
        let h = l.h;
        let mut gx = ImageF32::new(w, h);
        let mut gy = ImageF32::new(w, h);
        let mut mag = ImageF32::new(w, h);

        if w >= 3 && h >= 3 {
            for y in 1..h - 1 {
                let above = l.row(y - 1);
                let here = l.row(y);
                let below = l.row(y + 1);
                let out_gx = gx.row_mut(y);
                let out_gy = gy.row_mut(y);
                let out_mag = mag.row_mut(y);
                for x in 1..w - 1 {
                    let dx = here[x + 1] - here[x - 1];
                    let dy = above[x] - below[x];
                    out_gx[x] = dx;
                    out_gy[x] = dy;
                    out_mag[x] = (dx * dx + dy * dy).sqrt();
                }
            }
        }

        Self { gx, gy, mag }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.gx.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.gx.h
    }

    /// Gradient orientation at (x, y) in `(-π, π]`.
    #[inline]
    pub fn orientation(&self, x: usize, y: usize) -> f32 {
        self.gy.get(x, y).atan2(self.gx.get(x, y))
    }

    /// Gradient magnitude at (x, y).
    #[inline]
    pub fn magnitude(&self, x: usize, y: usize) -> f32 {
        self.mag.get(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize, kx: f32, ky: f32) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, kx * x as f32 + ky * y as f32);
            }
        }
        img
    }

    #[test]
    fn horizontal_ramp_has_constant_gx() {
        let grad = GradientField::compute(&ramp(8, 6, 3.0, 0.0));
        for y in 1..5 {
            for x in 1..7 {
                assert!((grad.gx.get(x, y) - 6.0).abs() < 1e-5);
                assert!(grad.gy.get(x, y).abs() < 1e-5);
                assert!((grad.magnitude(x, y) - 6.0).abs() < 1e-5);
                assert!(grad.orientation(x, y).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn vertical_ramp_points_down_in_image_coordinates() {
        // intensity grows with y, so the upward derivative is negative
        let grad = GradientField::compute(&ramp(6, 8, 0.0, 2.0));
        for y in 1..7 {
            for x in 1..5 {
                assert!((grad.gy.get(x, y) + 4.0).abs() < 1e-5);
                assert!(
                    (grad.orientation(x, y) + std::f32::consts::FRAC_PI_2).abs() < 1e-5,
                    "orientation {}",
                    grad.orientation(x, y)
                );
            }
        }
    }

    #[test]
    fn border_stays_zero() {
        let grad = GradientField::compute(&ramp(8, 6, 3.0, 1.0));
        for x in 0..8 {
            assert_eq!(grad.magnitude(x, 0), 0.0);
            assert_eq!(grad.magnitude(x, 5), 0.0);
        }
        for y in 0..6 {
            assert_eq!(grad.magnitude(0, y), 0.0);
            assert_eq!(grad.magnitude(7, y), 0.0);
        }
    }

    #[test]
    fn degenerate_images_yield_empty_fields() {
        let grad = GradientField::compute(&ImageF32::new(2, 5));
        assert_eq!(grad.width(), 2);
        assert!(grad.mag.data.iter().all(|&v| v == 0.0));
    }
}
