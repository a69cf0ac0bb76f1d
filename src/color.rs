use crate::rtweekend::*;

pub type Color = Vec3;

/// Gamma-2 transfer; negative or zero intensities map to zero.
#[inline]
pub fn linear_to_gamma(linear_component: f64) -> f64 {
    if linear_component > 0.0 {
        linear_component.sqrt()
    } else {
        0.0
    }
}

/// Quantizes an averaged linear color into the three bytes of `pixel`.
pub fn write_color(pixel: &mut [u8], pixel_color: Color) {
    const INTENSITY: Interval = Interval::new(0.000, 0.999);

    for (byte, channel) in pixel.iter_mut().zip([pixel_color.x, pixel_color.y, pixel_color.z]) {
        *byte = (256.0 * INTENSITY.clamp(linear_to_gamma(channel))) as u8;
    }
}
