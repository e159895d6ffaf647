use serde::{Deserialize, Serialize};

use crate::error::{Error, TintaResult};

/// RGBA color with 8-bit components
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Color {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

fn parse_hex_component(hex: &str, original: &str) -> TintaResult<u8> {
    u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidHexColor {
        value: original.to_string(),
        reason: format!("invalid hex component '{}'", hex),
    })
}

/// Hue in degrees, saturation and lightness in [0, 1], alpha kept as the 8-bit channel.
#[derive(Clone, Copy, PartialEq, Debug)]
struct Hsla {
    h: f64,
    s: f64,
    l: f64,
    a: u8,
}

impl Hsla {
    fn from_color(color: Color) -> Self {
        let r = f64::from(color.r) / 255.0;
        let g = f64::from(color.g) / 255.0;
        let b = f64::from(color.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;
        let l = (max + min) / 2.0;
        let mut h = 0.0;
        let mut s = 0.0;

        if chroma > 0.0 {
            let raw_saturation = if l <= 0.5 {
                chroma / (2.0 * l)
            } else {
                chroma / (2.0 - 2.0 * l)
            };
            s = raw_saturation.min(1.0);

            h = if max == r {
                (g - b) / chroma + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / chroma + 2.0
            } else {
                (r - g) / chroma + 4.0
            };
            h *= 60.0;
        }

        Self { h, s, l, a: color.a }
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    fn to_color(self) -> Color {
        let l = self.l.clamp(0.0, 1.0);
        let s = self.s.clamp(0.0, 1.0);
        let h = self.h / 360.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                Self::hue_to_rgb(p, q, h + 1.0 / 3.0),
                Self::hue_to_rgb(p, q, h),
                Self::hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Color {
            r: unit_to_channel(r),
            g: unit_to_channel(g),
            b: unit_to_channel(b),
            a: self.a,
        }
    }
}

#[inline]
fn unit_to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[inline]
fn relative_luminance_component(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Color {
    pub(crate) const WHITE: Color = Color::new(255, 255, 255, 255);
    pub(crate) const BLACK: Color = Color::new(0, 0, 0, 255);

    /// Creates a color from its 4 channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// The alpha channel.
    pub fn alpha(&self) -> u8 {
        self.a
    }

    /// Outputs the hex value for that colour.
    #[inline]
    pub fn as_hex(&self) -> String {
        if self.a < 255 {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        } else {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        }
    }

    /// Creates a Color from a string (in theory a hex but it can also be black/white).
    ///
    /// Errors if the string is not a valid hex colour.
    pub fn from_hex(hex: &str) -> TintaResult<Self> {
        let original = hex;
        let hex = hex.trim_start_matches('#');

        if hex == "white" {
            return Ok(Color::WHITE);
        } else if hex == "black" {
            return Ok(Color::BLACK);
        }
        if !hex.is_ascii() {
            return Err(Error::InvalidHexColor {
                value: original.to_string(),
                reason: "non ascii characters".to_string(),
            });
        }

        match hex.len() {
            // #RGB and #RGBA, each digit is doubled: F -> FF
            3 | 4 => {
                let mut channels = [255u8; 4];
                for (i, channel) in channels.iter_mut().enumerate().take(hex.len()) {
                    *channel = parse_hex_component(&hex[i..i + 1], original)? * 17;
                }
                let [r, g, b, a] = channels;
                Ok(Color { r, g, b, a })
            }
            // #RRGGBB and #RRGGBBAA
            6 | 8 => {
                let mut channels = [255u8; 4];
                for (i, channel) in channels.iter_mut().enumerate().take(hex.len() / 2) {
                    *channel = parse_hex_component(&hex[i * 2..i * 2 + 2], original)?;
                }
                let [r, g, b, a] = channels;
                Ok(Color { r, g, b, a })
            }
            _ => Err(Error::InvalidHexColor {
                value: original.to_string(),
                reason: format!("invalid length {}", hex.len()),
            }),
        }
    }

    /// WCAG relative luminance, rounded to 4 decimals.
    pub fn relative_luminance(&self) -> f64 {
        let luminance = 0.2126 * relative_luminance_component(self.r)
            + 0.7152 * relative_luminance_component(self.g)
            + 0.0722 * relative_luminance_component(self.b);
        (luminance * 10_000.0).round() / 10_000.0
    }

    pub fn is_lighter_than(&self, other: &Color) -> bool {
        self.relative_luminance() > other.relative_luminance()
    }

    pub fn is_darker_than(&self, other: &Color) -> bool {
        self.relative_luminance() < other.relative_luminance()
    }

    /// Reduces the HSL lightness by `factor` of itself.
    pub fn darken(&self, factor: f64) -> Color {
        let mut hsla = Hsla::from_color(*self);
        hsla.l -= hsla.l * factor;
        hsla.to_color()
    }

    /// Increases the HSL lightness by `factor` of itself.
    pub fn lighten(&self, factor: f64) -> Color {
        let mut hsla = Hsla::from_color(*self);
        hsla.l += hsla.l * factor;
        hsla.to_color()
    }

    /// Scales the alpha channel by `factor`.
    pub fn transparent(&self, factor: f64) -> Color {
        Color {
            a: unit_to_channel(f64::from(self.a) / 255.0 * factor),
            ..*self
        }
    }

    /// Lightens `of` towards `relative` unless it is already lighter.
    /// `factor` defaults to 0.5 when 0.
    pub fn get_lighter_color(of: &Color, relative: &Color, factor: f64) -> Color {
        if of.is_lighter_than(relative) {
            return *of;
        }
        let factor = if factor == 0.0 { 0.5 } else { factor };
        let lum_of = of.relative_luminance();
        let lum_relative = relative.relative_luminance();
        if lum_relative == 0.0 {
            return *of;
        }
        of.lighten(factor * (lum_relative - lum_of) / lum_relative)
    }

    /// Darkens `of` towards `relative` unless it is already darker.
    /// `factor` defaults to 0.5 when 0.
    pub fn get_darker_color(of: &Color, relative: &Color, factor: f64) -> Color {
        if of.is_darker_than(relative) {
            return *of;
        }
        let factor = if factor == 0.0 { 0.5 } else { factor };
        let lum_of = of.relative_luminance();
        let lum_relative = relative.relative_luminance();
        if lum_of == 0.0 {
            return *of;
        }
        of.darken(factor * (lum_of - lum_relative) / lum_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Color {
        Color::from_hex(s).unwrap()
    }

    #[test]
    fn can_parse_hex_colors() {
        let inputs = vec![
            ("#F00", Color::rgb(255, 0, 0)),
            ("#369", Color::rgb(51, 102, 153)),
            ("#FFF0", Color::new(255, 255, 255, 0)),
            ("#0008", Color::new(0, 0, 0, 136)),
            ("#123456", Color::rgb(18, 52, 86)),
            ("#aAbBcC", Color::rgb(170, 187, 204)),
            ("#FF00FF80", Color::new(255, 0, 255, 128)),
            ("#00000000", Color::new(0, 0, 0, 0)),
            ("1e1e1e", Color::rgb(30, 30, 30)),
            ("white", Color::WHITE),
            ("black", Color::BLACK),
        ];

        for (input, expected) in inputs {
            assert_eq!(hex(input), expected, "{input}");
        }
    }

    #[test]
    fn error_on_invalid_format() {
        assert!(Color::from_hex("#FF").is_err());
        assert!(Color::from_hex("#FFFFF").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn hex_output_skips_opaque_alpha() {
        assert_eq!(hex("#112233").as_hex(), "#112233");
        assert_eq!(hex("#11223344").as_hex(), "#11223344");
    }

    #[test]
    fn zero_factor_is_identity() {
        for input in ["#112233", "#FF0000", "#808080", "#ABCDEF80", "#000000", "#FFFFFF"] {
            let color = hex(input);
            assert_eq!(color.darken(0.0), color, "{input}");
            assert_eq!(color.lighten(0.0), color, "{input}");
            assert_eq!(color.transparent(1.0), color, "{input}");
        }
    }

    #[test]
    fn darken_and_lighten_move_lightness() {
        let grey = hex("#808080");
        assert_eq!(grey.darken(1.0), Color::BLACK);
        assert_eq!(grey.darken(0.5), hex("#404040"));
        assert_eq!(grey.lighten(1.0), Color::WHITE);
        // lightness is clamped
        assert_eq!(Color::WHITE.lighten(0.5), Color::WHITE);
    }

    #[test]
    fn transparent_scales_alpha() {
        assert_eq!(hex("#FF0000").transparent(0.5).alpha(), 128);
        assert_eq!(hex("#FF000080").transparent(0.5).alpha(), 64);
        assert_eq!(hex("#FF0000").transparent(0.0).alpha(), 0);
    }

    #[test]
    fn luminance_ordering() {
        assert_eq!(Color::BLACK.relative_luminance(), 0.0);
        assert_eq!(Color::WHITE.relative_luminance(), 1.0);
        assert!(Color::BLACK.is_darker_than(&Color::WHITE));
        assert!(Color::WHITE.is_lighter_than(&Color::BLACK));
        assert!(!Color::WHITE.is_darker_than(&Color::WHITE));
    }

    #[test]
    fn lighter_and_darker_relative_colors() {
        let dark = hex("#202020");
        let light = hex("#E0E0E0");
        // already on the requested side
        assert_eq!(Color::get_lighter_color(&light, &dark, 0.5), light);
        assert_eq!(Color::get_darker_color(&dark, &light, 0.5), dark);

        let lighter = Color::get_lighter_color(&dark, &light, 0.5);
        assert!(lighter.is_lighter_than(&dark));
        let darker = Color::get_darker_color(&light, &dark, 0.5);
        assert!(darker.is_darker_than(&light));
    }
}
