//! Evenly spaced HLS colour palette

use roomcast_core::Color;

const LIGHTNESS: f32 = 0.6;
const SATURATION: f32 = 0.65;
const HUE_OFFSET: f32 = 0.01;

/// `n` colours with hues evenly spaced around the wheel, fixed lightness and
/// saturation. Colour `i` depends only on `i` and `n`.
pub fn hls_palette(n: usize) -> Vec<Color> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32 + HUE_OFFSET).rem_euclid(1.0);
            let [r, g, b] = hls_to_rgb(hue, LIGHTNESS, SATURATION);
            Color::rgb(r, g, b)
        })
        .collect()
}

/// Convert hue/lightness/saturation (all in [0, 1]) to RGB
pub fn hls_to_rgb(h: f32, l: f32, s: f32) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    [
        channel(m1, m2, h + 1.0 / 3.0),
        channel(m1, m2, h),
        channel(m1, m2, h - 1.0 / 3.0),
    ]
}

fn channel(m1: f32, m2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
