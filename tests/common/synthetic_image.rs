use orientation_detector::image::ImageF32;

/// Linear intensity ramp `I(x, y) = kx·x + ky·y`: the central-difference
/// gradient is `(2·kx, −2·ky)` at every interior pixel.
pub fn ramp_f32(width: usize, height: usize, kx: f32, ky: f32) -> ImageF32 {
    let mut img = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            img.set(x, y, kx * x as f32 + ky * y as f32);
        }
    }
    img
}

/// Two-wedge image: intensity grows with `x` on the left half and with `y`
/// on the right half, giving two distinct gradient orientations.
pub fn two_wedge_f32(width: usize, height: usize, k: f32) -> ImageF32 {
    let mut img = ImageF32::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = if x < width / 2 {
                k * x as f32
            } else {
                k * y as f32
            };
            img.set(x, y, v);
        }
    }
    img
}
