use crate::core::color::{convert_color, is_common_style_key, ColorFormat};
use crate::core::shadow::derive_shadow_variables;
use crate::domain::theme::{Mode, ThemeObject, ThemeStyleMap};
use std::collections::BTreeMap;

const DEFAULT_LIGHT_STYLES: &[(&str, &str)] = &[
    ("background", "oklch(1 0 0)"),
    ("foreground", "oklch(0.145 0 0)"),
    ("card", "oklch(1 0 0)"),
    ("card-foreground", "oklch(0.145 0 0)"),
    ("popover", "oklch(1 0 0)"),
    ("popover-foreground", "oklch(0.145 0 0)"),
    ("primary", "oklch(0.205 0 0)"),
    ("primary-foreground", "oklch(0.985 0 0)"),
    ("secondary", "oklch(0.97 0 0)"),
    ("secondary-foreground", "oklch(0.205 0 0)"),
    ("muted", "oklch(0.97 0 0)"),
    ("muted-foreground", "oklch(0.556 0 0)"),
    ("accent", "oklch(0.97 0 0)"),
    ("accent-foreground", "oklch(0.205 0 0)"),
    ("destructive", "oklch(0.577 0.245 27.325)"),
    ("border", "oklch(0.922 0 0)"),
    ("input", "oklch(0.922 0 0)"),
    ("ring", "oklch(0.708 0 0)"),
    ("chart-1", "oklch(0.81 0.1 252)"),
    ("chart-2", "oklch(0.62 0.19 260)"),
    ("chart-3", "oklch(0.55 0.22 263)"),
    ("chart-4", "oklch(0.49 0.22 264)"),
    ("chart-5", "oklch(0.42 0.18 266)"),
    ("sidebar", "oklch(0.985 0 0)"),
    ("sidebar-foreground", "oklch(0.145 0 0)"),
    ("sidebar-primary", "oklch(0.205 0 0)"),
    ("sidebar-primary-foreground", "oklch(0.985 0 0)"),
    ("sidebar-accent", "oklch(0.97 0 0)"),
    ("sidebar-accent-foreground", "oklch(0.205 0 0)"),
    ("sidebar-border", "oklch(0.922 0 0)"),
    ("sidebar-ring", "oklch(0.708 0 0)"),
    ("radius", "0.625rem"),
    ("font-sans", "Inter, ui-sans-serif, system-ui, sans-serif"),
    ("font-serif", "Source Serif 4, ui-serif, Georgia, serif"),
    ("font-mono", "JetBrains Mono, ui-monospace, monospace"),
    ("letter-spacing", "0em"),
    ("spacing", "0.25rem"),
    ("shadow-color", "oklch(0 0 0)"),
    ("shadow-opacity", "0.1"),
    ("shadow-blur", "3px"),
    ("shadow-spread", "0px"),
    ("shadow-offset-x", "0"),
    ("shadow-offset-y", "1px"),
];

const DEFAULT_DARK_STYLES: &[(&str, &str)] = &[
    ("background", "oklch(0.145 0 0)"),
    ("foreground", "oklch(0.985 0 0)"),
    ("card", "oklch(0.205 0 0)"),
    ("card-foreground", "oklch(0.985 0 0)"),
    ("popover", "oklch(0.269 0 0)"),
    ("popover-foreground", "oklch(0.985 0 0)"),
    ("primary", "oklch(0.922 0 0)"),
    ("primary-foreground", "oklch(0.205 0 0)"),
    ("secondary", "oklch(0.269 0 0)"),
    ("secondary-foreground", "oklch(0.985 0 0)"),
    ("muted", "oklch(0.269 0 0)"),
    ("muted-foreground", "oklch(0.708 0 0)"),
    ("accent", "oklch(0.371 0 0)"),
    ("accent-foreground", "oklch(0.985 0 0)"),
    ("destructive", "oklch(0.704 0.191 22.216)"),
    ("border", "oklch(0.275 0 0)"),
    ("input", "oklch(0.325 0 0)"),
    ("ring", "oklch(0.556 0 0)"),
    ("chart-1", "oklch(0.81 0.1 252)"),
    ("chart-2", "oklch(0.62 0.19 260)"),
    ("chart-3", "oklch(0.55 0.22 263)"),
    ("chart-4", "oklch(0.49 0.22 264)"),
    ("chart-5", "oklch(0.42 0.18 266)"),
    ("sidebar", "oklch(0.205 0 0)"),
    ("sidebar-foreground", "oklch(0.985 0 0)"),
    ("sidebar-primary", "oklch(0.488 0.243 264.376)"),
    ("sidebar-primary-foreground", "oklch(0.985 0 0)"),
    ("sidebar-accent", "oklch(0.269 0 0)"),
    ("sidebar-accent-foreground", "oklch(0.985 0 0)"),
    ("sidebar-border", "oklch(0.275 0 0)"),
    ("sidebar-ring", "oklch(0.439 0 0)"),
    ("shadow-color", "oklch(0 0 0)"),
    ("shadow-opacity", "0.1"),
    ("shadow-blur", "3px"),
    ("shadow-spread", "0px"),
    ("shadow-offset-x", "0"),
    ("shadow-offset-y", "1px"),
];

pub fn default_styles(mode: Mode) -> ThemeStyleMap {
    let table = match mode {
        Mode::Light => DEFAULT_LIGHT_STYLES,
        Mode::Dark => DEFAULT_DARK_STYLES,
    };
    table
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// The compiled, mode-selected CSS variable set handed to templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeStyles {
    vars: BTreeMap<String, String>,
}

impl ThemeStyles {
    /// Look up by variable (`--primary`) or token (`primary`) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.starts_with("--") {
            self.vars.get(name).map(String::as_str)
        } else {
            self.vars.get(&format!("--{}", name)).map(String::as_str)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `--a: 1; --b: 2;` ready for a `style` attribute or a `:root` block.
    pub fn to_css_declarations(&self) -> String {
        self.vars
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn overlay(base: &mut ThemeStyleMap, custom: &ThemeStyleMap) {
    for (key, value) in custom {
        if !value.trim().is_empty() {
            base.insert(key.clone(), value.clone());
        }
    }
}

/// Merge a saved theme over the defaults and compile it for `mode`.
///
/// Common keys (fonts, radius, spacing, shadow parameters) are always taken
/// from the light styles, whatever the mode. Color keys come from the active
/// mode and are converted to `format`. The shadow ladder is appended last.
pub fn resolve_theme_styles(
    theme: Option<&ThemeObject>,
    mode: Mode,
    format: ColorFormat,
) -> ThemeStyles {
    let mut light = default_styles(Mode::Light);
    let mut active = default_styles(mode);
    if let Some(theme) = theme {
        overlay(&mut light, &theme.styles.light);
        overlay(&mut active, theme.styles_for(mode));
    }

    let mut vars = BTreeMap::new();

    // 1. 共用（非顏色）設定一律取自 light
    for (key, value) in light.iter().filter(|(key, _)| is_common_style_key(key)) {
        vars.insert(format!("--{}", key), value.clone());
    }

    // 2. 目前模式的顏色
    for (key, value) in active.iter().filter(|(key, _)| !is_common_style_key(key)) {
        vars.insert(format!("--{}", key), convert_color(value, format));
    }

    // 3. 陰影：模式設定優先，缺的參數回退到 light
    let mut shadow_input: ThemeStyleMap = light
        .iter()
        .filter(|(key, _)| key.starts_with("shadow-"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    overlay(&mut shadow_input, &active);
    vars.extend(derive_shadow_variables(&shadow_input));

    ThemeStyles { vars }
}
