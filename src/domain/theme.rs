use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Token name (`primary`, `font-sans`, `shadow-blur`, ...) to raw value.
pub type ThemeStyleMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Mode::Light),
            "dark" => Ok(Mode::Dark),
            other => Err(format!("unknown mode '{}'", other)),
        }
    }
}

/// A project's saved theme: a preset name plus per-mode token overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThemeObject {
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub styles: ThemeModeStyles,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ThemeModeStyles {
    #[serde(default, deserialize_with = "string_tokens")]
    pub light: ThemeStyleMap,
    #[serde(default, deserialize_with = "string_tokens")]
    pub dark: ThemeStyleMap,
}

impl ThemeObject {
    /// Decode a stored `theme_object`. The API hands it over either as a JSON
    /// object or as a string holding encoded JSON; anything else is treated
    /// as "never customised".
    pub fn from_value(value: &Value) -> Option<ThemeObject> {
        let decoded = match value {
            Value::Null => return None,
            Value::String(raw) if raw.trim().is_empty() => return None,
            Value::String(raw) => serde_json::from_str::<ThemeObject>(raw),
            Value::Object(_) => ThemeObject::deserialize(value),
            _ => {
                tracing::warn!("Ignoring theme_object of unexpected JSON type");
                return None;
            }
        };

        match decoded {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!("Ignoring malformed theme_object: {}", e);
                None
            }
        }
    }

    pub fn styles_for(&self, mode: Mode) -> &ThemeStyleMap {
        match mode {
            Mode::Light => &self.styles.light,
            Mode::Dark => &self.styles.dark,
        }
    }
}

/// Keep string-valued tokens only; numbers, nulls and nested objects are
/// dropped rather than failing the whole theme.
fn string_tokens<'de, D>(deserializer: D) -> Result<ThemeStyleMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}
