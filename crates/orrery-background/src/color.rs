//! Color utility functions for background animations.

use orrery_core::Rgb;
use ratatui::style::Color;

/// Move `current` toward `target` by fraction `f` of the remaining distance.
pub fn ease(current: f32, target: f32, f: f32) -> f32 {
    current + (target - current) * f
}

/// Blend between two colors, weighting `c1` by `1 - f` and `c2` by `f`.
///
/// The scene animator calls this as `mix(target, current, 0.3)`, which keeps
/// the color trailing its target by a fixed 30% each frame.
pub fn mix(c1: Rgb, c2: Rgb, f: f32) -> Rgb {
    c1.lerp(c2, f)
}

/// Linear interpolation between unit-float triples.
pub fn lerp3(a: [f32; 3], b: [f32; 3], f: f32) -> [f32; 3] {
    [ease(a[0], b[0], f), ease(a[1], b[1], f), ease(a[2], b[2], f)]
}

/// Screen blend of `src` over `dst`, applied with weight `alpha`.
pub fn screen(dst: [f32; 3], src: [f32; 3], alpha: f32) -> [f32; 3] {
    let blended = [
        1.0 - (1.0 - src[0]) * (1.0 - dst[0]),
        1.0 - (1.0 - src[1]) * (1.0 - dst[1]),
        1.0 - (1.0 - src[2]) * (1.0 - dst[2]),
    ];
    lerp3(dst, blended, alpha.clamp(0.0, 1.0))
}

/// Unit-float channels of a terminal color, if it carries an RGB value.
pub fn color_to_unit(color: Color) -> Option<[f32; 3]> {
    match color {
        Color::Rgb(r, g, b) => Some(Rgb::new(r, g, b).to_unit()),
        Color::Black => Some([0.0; 3]),
        _ => None,
    }
}

pub fn unit_to_color(c: [f32; 3]) -> Color {
    Rgb::from_unit(c).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_never_overshoots() {
        let mut v = 0.0;
        for _ in 0..100 {
            let next = ease(v, 10.0, 0.3);
            assert!(next >= v && next <= 10.0);
            v = next;
        }
    }

    #[test]
    fn test_mix_weights_first_argument() {
        let target = Rgb::new(100, 100, 100);
        let current = Rgb::new(0, 0, 0);
        assert_eq!(mix(target, current, 0.3), Rgb::new(70, 70, 70));
    }

    #[test]
    fn test_screen_brightens() {
        let dst = [0.2, 0.2, 0.2];
        let out = screen(dst, [0.5, 0.0, 0.0], 1.0);
        assert!(out[0] > dst[0]);
        assert!((out[1] - dst[1]).abs() < 1e-6);
        assert_eq!(screen(dst, [1.0; 3], 0.0), dst);
    }

    #[test]
    fn test_color_to_unit() {
        assert_eq!(color_to_unit(Color::Rgb(255, 0, 0)), Some([1.0, 0.0, 0.0]));
        assert_eq!(color_to_unit(Color::Reset), None);
    }
}
