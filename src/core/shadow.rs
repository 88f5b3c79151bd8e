//! Shadow variables derived from the six shadow intent tokens.

use crate::core::color::{format_color, format_number, parse_css_color, ColorFormat};
use crate::domain::theme::ThemeStyleMap;
use std::collections::BTreeMap;

const DEFAULT_SHADOW_COLOR: &str = "hsl(0 0% 0%)";
const DEFAULT_SHADOW_OPACITY: f32 = 0.1;
const DEFAULT_SHADOW_BLUR: &str = "3px";
const DEFAULT_SHADOW_SPREAD: &str = "0px";
const DEFAULT_SHADOW_OFFSET_X: &str = "0";
const DEFAULT_SHADOW_OFFSET_Y: &str = "1px";

/// One rung of the ladder. Blur factors never decrease going up.
struct ShadowStep {
    name: &'static str,
    blur_factor: f32,
    opacity_factor: f32,
    /// Fixed y-offset and blur of the tight second layer, if any.
    inner_layer: Option<(&'static str, &'static str)>,
}

const SHADOW_LADDER: [ShadowStep; 8] = [
    ShadowStep { name: "--shadow-2xs", blur_factor: 0.5, opacity_factor: 0.5, inner_layer: None },
    ShadowStep { name: "--shadow-xs", blur_factor: 0.75, opacity_factor: 0.5, inner_layer: None },
    ShadowStep { name: "--shadow-sm", blur_factor: 1.0, opacity_factor: 1.0, inner_layer: Some(("1px", "2px")) },
    ShadowStep { name: "--shadow", blur_factor: 1.0, opacity_factor: 1.0, inner_layer: Some(("1px", "2px")) },
    ShadowStep { name: "--shadow-md", blur_factor: 1.5, opacity_factor: 1.0, inner_layer: Some(("2px", "4px")) },
    ShadowStep { name: "--shadow-lg", blur_factor: 2.0, opacity_factor: 1.0, inner_layer: Some(("4px", "6px")) },
    ShadowStep { name: "--shadow-xl", blur_factor: 3.0, opacity_factor: 1.0, inner_layer: Some(("8px", "10px")) },
    ShadowStep { name: "--shadow-2xl", blur_factor: 4.0, opacity_factor: 2.5, inner_layer: None },
];

/// A CSS length split into magnitude and unit; `"0"` has an empty unit.
#[derive(Debug, Clone, PartialEq)]
struct Length {
    value: f32,
    unit: String,
}

impl Length {
    fn parse(text: &str) -> Option<Length> {
        let text = text.trim();
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let value = number.parse::<f32>().ok().filter(|v| v.is_finite())?;
        if !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
            return None;
        }
        Some(Length {
            value,
            unit: unit.to_string(),
        })
    }

    fn scaled(&self, factor: f32) -> String {
        let unit = if self.unit.is_empty() && self.value != 0.0 {
            "px"
        } else {
            self.unit.as_str()
        };
        format!("{}{}", format_number(self.value * factor), unit)
    }

    fn shifted(&self, delta: f32) -> String {
        let unit = if self.unit.is_empty() { "px" } else { self.unit.as_str() };
        format!("{}{}", format_number(self.value + delta), unit)
    }
}

/// Compute `--shadow-2xs` … `--shadow-2xl` from `shadow-*` tokens.
///
/// Missing tokens use the stock defaults. The color is emitted as HSL with the
/// (step-scaled) opacity as alpha; a color that does not parse is used as-is.
pub fn derive_shadow_variables(styles: &ThemeStyleMap) -> BTreeMap<String, String> {
    let token = |key: &str, default: &'static str| -> String {
        styles
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    };

    let color = token("shadow-color", DEFAULT_SHADOW_COLOR);
    let opacity = styles
        .get("shadow-opacity")
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_SHADOW_OPACITY)
        .clamp(0.0, 1.0);
    let blur = token("shadow-blur", DEFAULT_SHADOW_BLUR);
    let spread = token("shadow-spread", DEFAULT_SHADOW_SPREAD);
    let offset_x = token("shadow-offset-x", DEFAULT_SHADOW_OFFSET_X);
    let offset_y = token("shadow-offset-y", DEFAULT_SHADOW_OFFSET_Y);

    let blur_length = Length::parse(&blur);
    let spread_length = Length::parse(&spread);

    let mut vars = BTreeMap::new();
    for step in &SHADOW_LADDER {
        let step_color = shadow_color(&color, (opacity * step.opacity_factor).min(1.0));
        let step_blur = match &blur_length {
            Some(length) => length.scaled(step.blur_factor),
            None => blur.clone(),
        };

        let mut value = format!(
            "{} {} {} {} {}",
            offset_x, offset_y, step_blur, spread, step_color
        );

        if let Some((inner_y, inner_blur)) = step.inner_layer {
            let inner_spread = match &spread_length {
                Some(length) => length.shifted(-1.0),
                None => spread.clone(),
            };
            value.push_str(&format!(
                ", {} {} {} {} {}",
                offset_x, inner_y, inner_blur, inner_spread, step_color
            ));
        }

        vars.insert(step.name.to_string(), value);
    }

    vars
}

fn shadow_color(color: &str, opacity: f32) -> String {
    match parse_css_color(color) {
        Some(mut parsed) => {
            parsed.alpha = opacity;
            format_color(parsed, ColorFormat::Hsl)
        }
        None => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles(pairs: &[(&str, &str)]) -> ThemeStyleMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> ThemeStyleMap {
        styles(&[
            ("shadow-color", "#000000"),
            ("shadow-opacity", "0.1"),
            ("shadow-blur", "3px"),
            ("shadow-spread", "0px"),
            ("shadow-offset-x", "0"),
            ("shadow-offset-y", "1px"),
        ])
    }

    fn primary_blur(value: &str) -> f32 {
        let blur = value.split_whitespace().nth(2).unwrap();
        Length::parse(blur).unwrap().value
    }

    #[test]
    fn test_ladder_shape() {
        let vars = derive_shadow_variables(&base());
        assert_eq!(vars.len(), 8);
        assert_eq!(
            vars.get("--shadow-2xs").unwrap(),
            "0 1px 1.5px 0px hsl(0 0% 0% / 0.05)"
        );
        assert_eq!(
            vars.get("--shadow-sm").unwrap(),
            "0 1px 3px 0px hsl(0 0% 0% / 0.1), 0 1px 2px -1px hsl(0 0% 0% / 0.1)"
        );
        assert_eq!(vars.get("--shadow").unwrap(), vars.get("--shadow-sm").unwrap());
        assert!(vars.get("--shadow-2xl").unwrap().ends_with("hsl(0 0% 0% / 0.25)"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        assert_eq!(derive_shadow_variables(&base()), derive_shadow_variables(&base()));
    }

    #[test]
    fn test_more_blur_means_more_blur_at_every_step() {
        let low = derive_shadow_variables(&base());
        let mut bigger = base();
        bigger.insert("shadow-blur".to_string(), "6px".to_string());
        let high = derive_shadow_variables(&bigger);

        for (name, value) in &low {
            assert!(
                primary_blur(&high[name]) > primary_blur(value),
                "{} did not grow",
                name
            );
        }
    }

    #[test]
    fn test_missing_tokens_use_defaults() {
        let vars = derive_shadow_variables(&ThemeStyleMap::new());
        assert_eq!(
            vars.get("--shadow-md").unwrap(),
            "0 1px 4.5px 0px hsl(0 0% 0% / 0.1), 0 2px 4px -1px hsl(0 0% 0% / 0.1)"
        );
    }

    #[test]
    fn test_unparseable_color_and_lengths_pass_through() {
        let vars = derive_shadow_variables(&styles(&[
            ("shadow-color", "var(--brand)"),
            ("shadow-blur", "calc(1px + 2px)"),
        ]));
        assert!(vars
            .get("--shadow-lg")
            .unwrap()
            .starts_with("0 1px calc(1px + 2px) 0px var(--brand)"));
    }
}
