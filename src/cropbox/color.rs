//! Perceptual brightness and black/white-point normalization
//!
//! Pure pixel math shared by the ray caster and background sampling.
//! Brightness uses the Rec. 601 luma weights.

/// Rec. 601 red weight
const LUMA_R: f64 = 0.299;

/// Rec. 601 green weight
const LUMA_G: f64 = 0.587;

/// Rec. 601 blue weight
const LUMA_B: f64 = 0.114;

/// Perceived brightness of an RGB triple, in [0, 255]
pub fn brightness(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b)
}

/// Remap a channel value onto a black/white-point ramp with gamma.
///
/// `value`, `black` and `white` are each clamped to [0, 255]. The black point
/// may exceed the white point: the ramp then inverts, so values darker than
/// the black point normalize high. Callers must guarantee `white != black`
/// for the run; the ray caster rejects that range before casting.
///
/// Returns a value in [0, 255].
pub fn normalize_color(value: f64, black: f64, white: f64, gamma: f64) -> f64 {
    let value = value.clamp(0.0, 255.0);
    let black = black.clamp(0.0, 255.0);
    let white = white.clamp(0.0, 255.0);

    // Negative ratios (value on the dark side of the ramp) floor at zero so
    // fractional gamma exponents stay real.
    let ratio = ((value - black) / (white - black)).max(0.0);
    (ratio.powf(1.0 / gamma) * 255.0).clamp(0.0, 255.0)
}

/// Perceived brightness of an RGB triple after per-channel normalization
pub fn normalized_brightness(r: u8, g: u8, b: u8, black: f64, white: f64, gamma: f64) -> f64 {
    let nr = normalize_color(f64::from(r), black, white, gamma);
    let ng = normalize_color(f64::from(g), black, white, gamma);
    let nb = normalize_color(f64::from(b), black, white, gamma);
    LUMA_R * nr + LUMA_G * ng + LUMA_B * nb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_weights() {
        assert_eq!(brightness(0, 0, 0), 0.0);
        assert!((brightness(255, 255, 255) - 255.0).abs() < 1e-9);
        assert!((brightness(255, 0, 0) - 0.299 * 255.0).abs() < 1e-9);
        assert!((brightness(0, 255, 0) - 0.587 * 255.0).abs() < 1e-9);
        assert!((brightness(0, 0, 255) - 0.114 * 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_linear_ramp() {
        // Midpoint of a 0..255 ramp with gamma 1 stays at the midpoint
        let mid = normalize_color(127.5, 0.0, 255.0, 1.0);
        assert!((mid - 127.5).abs() < 1e-9);

        // Below the black point clamps to zero
        assert_eq!(normalize_color(5.0, 10.0, 200.0, 1.0), 0.0);

        // Above the white point clamps to 255
        assert_eq!(normalize_color(250.0, 10.0, 200.0, 1.0), 255.0);
    }

    #[test]
    fn test_normalize_inverted_ramp() {
        // A black point above the white point inverts the ramp: dark pixels
        // normalize high. This is what happens on bright backgrounds.
        let dark = normalize_color(0.0, 255.0, 60.0, 1.0);
        assert_eq!(dark, 255.0);

        let bright = normalize_color(255.0, 255.0, 60.0, 1.0);
        assert_eq!(bright, 0.0);
    }

    #[test]
    fn test_normalize_clamps_inputs() {
        // Out-of-range arguments fold into [0, 255] before the ramp
        let v = normalize_color(300.0, -10.0, 300.0, 1.0);
        assert!((v - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_gamma() {
        // gamma 2 applies exponent 0.5: a quarter-ramp value maps to half
        let v = normalize_color(63.75, 0.0, 255.0, 2.0);
        assert!((v - 127.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_brightness_gray() {
        // Gray pixels normalize each channel identically, so the weighted sum
        // equals the per-channel value.
        let v = normalized_brightness(100, 100, 100, 0.0, 255.0, 1.0);
        assert!((v - 100.0).abs() < 1e-9);
    }
}
