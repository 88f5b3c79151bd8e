//! Theme color compilation.
//!
//! Stored theme tokens may use any common CSS color notation. Before they are
//! handed to a template they are normalised into one output format. A value
//! that cannot be parsed is passed through untouched so a bad token costs a
//! wrong color, never a broken page.
//!
//! Parsed colors are held in Oklch without gamut mapping. Only the sRGB based
//! outputs (`hsl`, `rgb`, `hex`) clamp, so wide-gamut tokens survive an
//! `oklch` to `oklch` pass unchanged.

use palette::convert::FromColorUnclamped;
use palette::{FromColor, Hsl, Oklab, Oklch, Srgb, Srgba};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tokens that are shared between modes and are never colors.
pub const COMMON_STYLE_KEYS: [&str; 11] = [
    "radius",
    "spacing",
    "font-sans",
    "font-serif",
    "font-mono",
    "letter-spacing",
    "shadow-opacity",
    "shadow-blur",
    "shadow-spread",
    "shadow-offset-x",
    "shadow-offset-y",
];

pub fn is_common_style_key(key: &str) -> bool {
    COMMON_STYLE_KEYS.contains(&key)
}

/// Color tokens are everything outside the common allow-list.
pub fn is_color_token(key: &str) -> bool {
    !is_common_style_key(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Oklch,
    Hsl,
    Rgb,
    Hex,
}

impl ColorFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorFormat::Oklch => "oklch",
            ColorFormat::Hsl => "hsl",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Hex => "hex",
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oklch" => Ok(ColorFormat::Oklch),
            "hsl" => Ok(ColorFormat::Hsl),
            "rgb" => Ok(ColorFormat::Rgb),
            "hex" => Ok(ColorFormat::Hex),
            other => Err(format!(
                "unknown color format '{}' (expected oklch, hsl, rgb or hex)",
                other
            )),
        }
    }
}

/// Convert `value` into `target`, or return it unchanged if it is not a color.
pub fn convert_color(value: &str, target: ColorFormat) -> String {
    match parse_css_color(value) {
        Some(color) => format_color(color, target),
        None => value.to_string(),
    }
}

/// A parsed color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssColor {
    pub color: Oklch<f32>,
    pub alpha: f32,
}

impl CssColor {
    pub fn new(color: Oklch<f32>, alpha: f32) -> Self {
        Self { color, alpha }
    }

    fn from_srgb(rgb: Srgb<f32>, alpha: f32) -> Self {
        Self::new(Oklch::from_color_unclamped(rgb), alpha)
    }

    /// The closest sRGB color; out-of-gamut channels are clamped.
    pub fn to_srgba(&self) -> Srgba<f32> {
        let rgb = Srgb::<f32>::from_color(self.color);
        Srgba::new(rgb.red, rgb.green, rgb.blue, self.alpha)
    }
}

pub fn format_color(color: CssColor, target: ColorFormat) -> String {
    let alpha = color.alpha.clamp(0.0, 1.0);
    let translucent = alpha < 0.9999;

    match target {
        ColorFormat::Oklch => {
            let lch = color.color;
            // Achromatic colors have no meaningful hue; pin it so output is stable.
            let hue = if lch.chroma < 0.0001 {
                0.0
            } else {
                lch.hue.into_positive_degrees()
            };
            let body = format!(
                "{} {} {}",
                format_number(lch.l),
                format_number(lch.chroma),
                format_number(hue)
            );
            with_alpha("oklch", body, alpha, translucent)
        }
        ColorFormat::Hsl => {
            let hsl: Hsl = Hsl::from_color(Srgb::<f32>::from_color(color.color));
            let hue = if hsl.saturation < 0.0001 {
                0.0
            } else {
                hsl.hue.into_positive_degrees()
            };
            let body = format!(
                "{} {}% {}%",
                format_number(hue),
                format_number(hsl.saturation * 100.0),
                format_number(hsl.lightness * 100.0)
            );
            with_alpha("hsl", body, alpha, translucent)
        }
        ColorFormat::Rgb => {
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(color.color).into_format();
            if translucent {
                format!(
                    "rgba({}, {}, {}, {})",
                    rgb.red,
                    rgb.green,
                    rgb.blue,
                    format_number(alpha)
                )
            } else {
                format!("rgb({}, {}, {})", rgb.red, rgb.green, rgb.blue)
            }
        }
        ColorFormat::Hex => {
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(color.color).into_format();
            if translucent {
                format!(
                    "#{:02x}{:02x}{:02x}{:02x}",
                    rgb.red,
                    rgb.green,
                    rgb.blue,
                    (alpha * 255.0).round() as u8
                )
            } else {
                format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
            }
        }
    }
}

fn with_alpha(function: &str, body: String, alpha: f32, translucent: bool) -> String {
    if translucent {
        format!("{}({} / {})", function, body, format_number(alpha))
    } else {
        format!("{}({})", function, body)
    }
}

/// At most four decimals, trailing zeros trimmed, no negative zero.
pub fn format_number(value: f32) -> String {
    if !value.is_finite() || value.abs() < 0.00005 {
        return "0".to_string();
    }
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Parse a CSS color expression.
pub fn parse_css_color(input: &str) -> Option<CssColor> {
    let value = input.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }

    if value == "transparent" {
        return Some(CssColor::from_srgb(Srgb::new(0.0, 0.0, 0.0), 0.0));
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(open) = value.find('(') {
        if !value.ends_with(')') {
            return None;
        }
        let function = value[..open].trim();
        let args = &value[open + 1..value.len() - 1];
        return parse_function(function, args);
    }

    if let Some(named) = palette::named::from_str(&value) {
        return Some(CssColor::from_srgb(named.into_format(), 1.0));
    }

    // Bare "H S% L%" triples as stored by older shadcn themes
    parse_bare_hsl(&value)
}

fn parse_hex(hex: &str) -> Option<CssColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };

    let alpha = if expanded.len() == 8 { channel(6)? } else { 1.0 };
    let rgb = Srgb::new(channel(0)?, channel(2)?, channel(4)?);
    Some(CssColor::from_srgb(rgb, alpha))
}

fn parse_function(function: &str, args: &str) -> Option<CssColor> {
    let (channels, slash_alpha) = match args.split_once('/') {
        Some((channels, alpha)) => (channels, Some(alpha.trim())),
        None => (args, None),
    };

    let parts: Vec<&str> = channels
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    // Legacy comma syntax carries alpha as a fourth channel.
    let (parts, alpha) = match (parts.len(), slash_alpha) {
        (3, None) => (&parts[..3], 1.0),
        (3, Some(alpha)) => (&parts[..3], parse_alpha(alpha)?),
        (4, None) => (&parts[..3], parse_alpha(parts[3])?),
        _ => return None,
    };

    let color = match function {
        "rgb" | "rgba" => {
            let rgb = Srgb::new(
                parse_rgb_channel(parts[0])?,
                parse_rgb_channel(parts[1])?,
                parse_rgb_channel(parts[2])?,
            );
            CssColor::from_srgb(rgb, alpha)
        }
        "hsl" | "hsla" => CssColor::from_srgb(hsl_to_srgb(parts[0], parts[1], parts[2])?, alpha),
        "oklch" => {
            let l = parse_scaled(parts[0], 1.0)?;
            let chroma = parse_scaled(parts[1], 0.4)?;
            let hue = parse_hue(parts[2])?;
            CssColor::new(Oklch::new(l, chroma.max(0.0), hue), alpha)
        }
        "oklab" => {
            let l = parse_scaled(parts[0], 1.0)?;
            let a = parse_scaled(parts[1], 0.4)?;
            let b = parse_scaled(parts[2], 0.4)?;
            CssColor::new(Oklch::from_color_unclamped(Oklab::new(l, a, b)), alpha)
        }
        _ => return None,
    };

    Some(color)
}

fn parse_bare_hsl(value: &str) -> Option<CssColor> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 || !parts[1].ends_with('%') || !parts[2].ends_with('%') {
        return None;
    }
    let color = hsl_to_srgb(parts[0], parts[1], parts[2])?;
    Some(CssColor::from_srgb(color, 1.0))
}

fn hsl_to_srgb(h: &str, s: &str, l: &str) -> Option<Srgb<f32>> {
    let hue = parse_hue(h)?;
    let saturation = parse_percentage_or_number(s)?;
    let lightness = parse_percentage_or_number(l)?;
    let hsl: Hsl = Hsl::new(hue, saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0));
    Some(Srgb::from_color(hsl))
}

fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// `50%` or `50` both mean one half.
fn parse_percentage_or_number(text: &str) -> Option<f32> {
    let text = text.trim();
    let number = parse_float(text.strip_suffix('%').unwrap_or(text))?;
    Some(number / 100.0)
}

/// Plain numbers as-is, percentages relative to `full_scale`.
fn parse_scaled(text: &str, full_scale: f32) -> Option<f32> {
    let text = text.trim();
    if text == "none" {
        return Some(0.0);
    }
    match text.strip_suffix('%') {
        Some(percent) => parse_float(percent).map(|p| p / 100.0 * full_scale),
        None => parse_float(text),
    }
}

fn parse_rgb_channel(text: &str) -> Option<f32> {
    let text = text.trim();
    let value = match text.strip_suffix('%') {
        Some(percent) => parse_float(percent)? / 100.0,
        None => parse_float(text)? / 255.0,
    };
    Some(value.clamp(0.0, 1.0))
}

fn parse_alpha(text: &str) -> Option<f32> {
    parse_scaled(text, 1.0).map(|a| a.clamp(0.0, 1.0))
}

fn parse_hue(text: &str) -> Option<f32> {
    let text = text.trim();
    if text == "none" {
        return Some(0.0);
    }
    if let Some(deg) = text.strip_suffix("deg") {
        return parse_float(deg);
    }
    if let Some(turn) = text.strip_suffix("turn") {
        return parse_float(turn).map(|t| t * 360.0);
    }
    if let Some(rad) = text.strip_suffix("rad") {
        return parse_float(rad).map(f32::to_degrees);
    }
    parse_float(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_rgb_conversions() {
        assert_eq!(convert_color("#ff0000", ColorFormat::Hex), "#ff0000");
        assert_eq!(convert_color("#F00", ColorFormat::Hex), "#ff0000");
        assert_eq!(convert_color("rgb(255, 0, 0)", ColorFormat::Hex), "#ff0000");
        assert_eq!(convert_color("rgb(255 0 0)", ColorFormat::Rgb), "rgb(255, 0, 0)");
        assert_eq!(convert_color("#ff0000", ColorFormat::Rgb), "rgb(255, 0, 0)");
        assert_eq!(convert_color("red", ColorFormat::Hex), "#ff0000");
    }

    #[test]
    fn test_hsl_conversions() {
        assert_eq!(convert_color("#ff0000", ColorFormat::Hsl), "hsl(0 100% 50%)");
        assert_eq!(convert_color("hsl(120 100% 50%)", ColorFormat::Hex), "#00ff00");
        assert_eq!(convert_color("hsl(120deg, 100%, 50%)", ColorFormat::Hex), "#00ff00");
        assert_eq!(convert_color("0 0% 100%", ColorFormat::Hex), "#ffffff");
        assert_eq!(convert_color("#000000", ColorFormat::Hsl), "hsl(0 0% 0%)");
    }

    #[test]
    fn test_oklch_conversions() {
        assert_eq!(convert_color("#000000", ColorFormat::Oklch), "oklch(0 0 0)");

        let white = convert_color("#ffffff", ColorFormat::Oklch);
        assert!(white.starts_with("oklch("));
        assert_eq!(convert_color(&white, ColorFormat::Hex), "#ffffff");

        let green = convert_color("oklch(0.52 0.13 144.17)", ColorFormat::Hex);
        assert!(green.starts_with('#') && green.len() == 7);
        assert_eq!(
            convert_color("oklch(52% 0.13 144.17)", ColorFormat::Hex),
            green
        );
    }

    #[test]
    fn test_alpha_is_kept() {
        assert_eq!(
            convert_color("rgba(255, 0, 0, 0.5)", ColorFormat::Hsl),
            "hsl(0 100% 50% / 0.5)"
        );
        assert_eq!(convert_color("#ff000080", ColorFormat::Hex), "#ff000080");
        assert_eq!(
            convert_color("rgb(255 0 0 / 50%)", ColorFormat::Rgb),
            "rgba(255, 0, 0, 0.5)"
        );
    }

    #[test]
    fn test_every_format_yields_that_notation() {
        let inputs = ["#336699", "rgb(10, 20, 30)", "hsl(200 50% 40%)", "oklch(0.7 0.1 30)", "teal"];
        for input in inputs {
            assert!(convert_color(input, ColorFormat::Oklch).starts_with("oklch("));
            assert!(convert_color(input, ColorFormat::Hsl).starts_with("hsl("));
            assert!(convert_color(input, ColorFormat::Rgb).starts_with("rgb("));
            let hex = convert_color(input, ColorFormat::Hex);
            assert!(hex.starts_with('#') && hex.len() == 7, "{} -> {}", input, hex);
        }
    }

    #[test]
    fn test_converted_output_parses_back_to_same_color() {
        let inputs = [
            "#336699",
            "rgb(10, 20, 30)",
            "hsl(200 50% 40%)",
            "oklch(0.7 0.1 30)",
            "oklab(0.6 -0.05 0.08)",
            "teal",
            "rgba(255, 0, 0, 0.5)",
        ];
        let formats = [ColorFormat::Oklch, ColorFormat::Hsl, ColorFormat::Rgb, ColorFormat::Hex];

        for input in inputs {
            let expected = parse_css_color(input).unwrap().to_srgba();
            for format in formats {
                let output = convert_color(input, format);
                let actual = parse_css_color(&output)
                    .unwrap_or_else(|| panic!("{} -> {:?} is not parseable: {}", input, format, output))
                    .to_srgba();
                for (a, b) in [
                    (actual.red, expected.red),
                    (actual.green, expected.green),
                    (actual.blue, expected.blue),
                    (actual.alpha, expected.alpha),
                ] {
                    assert!((a - b).abs() < 0.004, "{} -> {} drifted", input, output);
                }
            }
        }
    }

    #[test]
    fn test_wide_gamut_oklch_is_not_clamped() {
        assert_eq!(
            convert_color("oklch(0.577 0.245 27.325)", ColorFormat::Oklch),
            "oklch(0.577 0.245 27.325)"
        );
        assert_eq!(
            convert_color("oklch(0.65 0.24 150)", ColorFormat::Oklch),
            "oklch(0.65 0.24 150)"
        );
        assert_eq!(
            convert_color("oklch(0.8 0.2 200 / 0.5)", ColorFormat::Oklch),
            "oklch(0.8 0.2 200 / 0.5)"
        );

        // sRGB outputs still land inside the gamut
        let hex = convert_color("oklch(0.65 0.24 150)", ColorFormat::Hex);
        assert!(hex.starts_with('#') && hex.len() == 7);
        let rgb = parse_css_color(&hex).unwrap().to_srgba();
        for channel in [rgb.red, rgb.green, rgb.blue] {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    #[test]
    fn test_unparseable_values_pass_through() {
        for value in ["not-a-color", "Inter, sans-serif", "0.5rem", "#12", "rgb(1, 2)", "hsl(a b c)", ""] {
            assert_eq!(convert_color(value, ColorFormat::Oklch), value);
        }
    }

    #[test]
    fn test_color_token_allow_list() {
        assert!(is_common_style_key("radius"));
        assert!(is_common_style_key("shadow-blur"));
        assert!(is_color_token("primary"));
        assert!(is_color_token("shadow-color"));
        assert!(is_color_token("sidebar-accent-foreground"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.12345), "0.1235");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(144.17), "144.17");
    }

    #[test]
    fn test_color_format_from_str() {
        assert_eq!("HEX".parse::<ColorFormat>().unwrap(), ColorFormat::Hex);
        assert!("cmyk".parse::<ColorFormat>().is_err());
    }
}
