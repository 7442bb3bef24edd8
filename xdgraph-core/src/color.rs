//! Color Decoding
//!
//! Unifies the structured channel object and the packed 32-bit integer into
//! one `#RRGGBB` uppercase string.

use crate::raw::{RawColor, RawColorValue, RawFill};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Channels arrive as 0-255 floats; they are rounded and clamped.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    /// Low 24 bits hold red/green/blue. Negative input is the signed view of
    /// the same 32-bit word.
    pub fn from_packed(value: i64) -> Self {
        let word = value as u32;
        Self {
            r: ((word >> 16) & 0xFF) as u8,
            g: ((word >> 8) & 0xFF) as u8,
            b: (word & 0xFF) as u8,
        }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

pub fn decode_value(value: &RawColorValue) -> Rgb {
    match value {
        RawColorValue::Packed(packed) => Rgb::from_packed(*packed),
        RawColorValue::Channels(c) => Rgb::from_channels(c.r, c.g, c.b),
    }
}

/// Hex string for a color object, or none when it carries no value.
pub fn color_hex(color: Option<&RawColor>) -> Option<String> {
    color?.value.as_ref().map(|v| decode_value(v).hex())
}

/// Only flat solid fills convert to a color.
pub fn fill_color(fill: Option<&RawFill>) -> Option<String> {
    let fill = fill?;
    match fill.kind() {
        Some("solid") => color_hex(fill.color.as_ref()),
        _ => None,
    }
}

pub fn alpha(color: Option<&RawColor>) -> f64 {
    color.and_then(|c| c.alpha).unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fill(value: serde_json::Value) -> RawFill {
        serde_json::from_value(value).unwrap()
    }

    fn pack(rgb: Rgb, alpha: u8) -> u32 {
        (u32::from(alpha) << 24) | (u32::from(rgb.r) << 16) | (u32::from(rgb.g) << 8) | u32::from(rgb.b)
    }

    #[test]
    fn test_packed_sign_independent() {
        let unsigned: u32 = 0xFF12_34AB;
        let signed = unsigned as i32;
        assert!(signed < 0);

        let a = Rgb::from_packed(i64::from(unsigned));
        let b = Rgb::from_packed(i64::from(signed));
        assert_eq!(a, b);
        assert_eq!(a.hex(), "#1234AB");
    }

    #[test]
    fn test_packed_round_trip() {
        for value in [0i64, 0x00FF_0000, 0x7FFF_FFFF, -1, -16_777_216, -8_355_712, 0x0102_0304] {
            let rgb = Rgb::from_packed(value);
            let alpha = ((value as u32) >> 24) as u8;
            let repacked = pack(rgb, alpha);
            assert_eq!(repacked, value as u32);
            assert_eq!(Rgb::from_packed(i64::from(repacked)), rgb);
            assert_eq!(Rgb::from_packed(i64::from(repacked as i32)), rgb);
        }
    }

    #[test]
    fn test_channels_rounded_and_clamped() {
        assert_eq!(Rgb::from_channels(254.6, -3.0, 300.0).hex(), "#FF00FF");
        assert_eq!(Rgb::from_channels(15.0, 160.0, 10.4).hex(), "#0FA00A");
    }

    #[test]
    fn test_fill_solid_only() {
        let solid = fill(json!({"type": "solid", "color": {"value": {"r": 255, "g": 0, "b": 0}}}));
        assert_eq!(fill_color(Some(&solid)).as_deref(), Some("#FF0000"));

        let none = fill(json!({"type": "none"}));
        assert_eq!(fill_color(Some(&none)), None);

        let gradient = fill(json!({"type": "gradient", "color": {"value": {"r": 1, "g": 2, "b": 3}}}));
        assert_eq!(fill_color(Some(&gradient)), None);

        let pattern = fill(json!({"type": "pattern"}));
        assert_eq!(fill_color(Some(&pattern)), None);

        assert_eq!(fill_color(None), None);
    }

    #[test]
    fn test_alpha_defaults_opaque() {
        let color: RawColor = serde_json::from_value(json!({"value": {"r": 0, "g": 0, "b": 0}})).unwrap();
        assert_eq!(alpha(Some(&color)), 1.0);
        assert_eq!(alpha(None), 1.0);

        let translucent: RawColor = serde_json::from_value(json!({"alpha": 0.25})).unwrap();
        assert_eq!(alpha(Some(&translucent)), 0.25);
    }
}
