//! Open Graph preview card for a tenant site, rasterised to PNG.

use crate::core::color::ColorFormat;
use crate::core::theme::resolve_theme_styles;
use crate::domain::model::Project;
use crate::domain::theme::Mode;
use crate::utils::error::{Result, SitesError};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::sync::{Arc, LazyLock};
use tiny_skia::{Pixmap, Transform};
use usvg::{fontdb, Options, Tree};

/// Path the card is served from on a tenant host.
pub const OG_IMAGE_PATH: &str = "/og-image.png";
pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;

const FALLBACK_DESCRIPTION: &str = "Built with Kislap";
const TITLE_MAX_CHARS: usize = 32;
const DESCRIPTION_MAX_CHARS: usize = 70;

static FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "Loaded system fonts for preview cards");
    Arc::new(db)
});

/// Text and colors of one preview card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgCard {
    pub title: String,
    pub description: String,
    /// `kislap.app / jane` branding line.
    pub footer: Option<String>,
    pub background: String,
    pub foreground: String,
    pub accent: String,
}

impl OgCard {
    /// Card in the project's light palette.
    pub fn for_project(project: &Project, tenant_id: &str, root_domain: &str) -> Self {
        let styles = resolve_theme_styles(project.theme().as_ref(), Mode::Light, ColorFormat::Hex);
        let color = |key: &str| styles.get(key).unwrap_or_default().to_string();

        let title = project
            .content
            .display_name()
            .unwrap_or(project.name.as_str())
            .to_string();
        let description = project
            .content
            .description()
            .or(project.description.as_deref().filter(|d| !d.trim().is_empty()))
            .unwrap_or(FALLBACK_DESCRIPTION)
            .to_string();

        Self {
            title,
            description,
            footer: Some(format!("{} / {}", root_domain, tenant_id)),
            background: color("background"),
            foreground: color("foreground"),
            accent: color("primary"),
        }
    }

    pub fn not_found() -> Self {
        Self {
            title: "Site not found".to_string(),
            description: String::new(),
            footer: None,
            background: "#ffffff".to_string(),
            foreground: "#000000".to_string(),
            accent: "#3b82f6".to_string(),
        }
    }

    pub fn to_svg(&self) -> String {
        let background = encode_double_quoted_attribute(&self.background);
        let foreground = encode_double_quoted_attribute(&self.foreground);
        let accent = encode_double_quoted_attribute(&self.accent);
        let text = |x: &str| encode_text(x).into_owned();

        let mut svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<defs><radialGradient id="glow" cx="50%" cy="50%" r="70%"><stop offset="0%" stop-color="{accent}" stop-opacity="0.125"/><stop offset="100%" stop-color="{accent}" stop-opacity="0"/></radialGradient></defs>
<rect width="{w}" height="{h}" fill="{background}"/>
<rect width="{w}" height="{h}" fill="url(#glow)"/>
<g font-family="sans-serif" text-anchor="middle" fill="{foreground}">
<text x="600" y="300" font-size="80" font-weight="800">{title}</text>
"##,
            w = OG_WIDTH,
            h = OG_HEIGHT,
            accent = accent,
            background = background,
            foreground = foreground,
            title = text(&clip(&self.title, TITLE_MAX_CHARS)),
        );

        if !self.description.is_empty() {
            svg.push_str(&format!(
                "<text x=\"600\" y=\"380\" font-size=\"30\" fill-opacity=\"0.8\">{}</text>\n",
                text(&clip(&self.description, DESCRIPTION_MAX_CHARS))
            ));
        }
        if let Some(footer) = &self.footer {
            svg.push_str(&format!(
                "<text x=\"600\" y=\"590\" font-size=\"20\" fill-opacity=\"0.5\">{}</text>\n",
                text(footer)
            ));
        }
        svg.push_str("</g>\n</svg>\n");
        svg
    }

    /// Rasterise to a `OG_WIDTH` x `OG_HEIGHT` PNG.
    pub fn render_png(&self) -> Result<Vec<u8>> {
        let options = Options {
            fontdb: FONTS.clone(),
            ..Options::default()
        };
        let tree = Tree::from_str(&self.to_svg(), &options).map_err(|e| SitesError::RenderError {
            message: format!("invalid preview card markup: {}", e),
        })?;

        let mut pixmap = Pixmap::new(OG_WIDTH, OG_HEIGHT).ok_or_else(|| SitesError::RenderError {
            message: "could not allocate preview canvas".to_string(),
        })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        pixmap.encode_png().map_err(|e| SitesError::RenderError {
            message: format!("PNG encoding failed: {}", e),
        })
    }
}

/// Single-line SVG text does not wrap.
fn clip(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars - 1).collect();
    clipped.truncate(clipped.trim_end().len());
    clipped.push('…');
    clipped
}
