//! Built-in page templates.
//!
//! Every template is a plain `fn(&TemplateContext) -> Document`. They share
//! one document shell that writes the `<head>` metadata and the compiled
//! theme as `:root` custom properties, so layouts only style on top of the
//! `var(--…)` tokens.

pub mod biz;
pub mod links;
pub mod portfolio;

use crate::core::dispatcher::{Document, TemplateContext, TemplateRegistryBuilder};
use crate::core::meta::PageMeta;
use crate::core::site::SiteErrorState;
use crate::core::theme::ThemeStyles;
use crate::domain::model::ProjectType;
use crate::domain::theme::Mode;
use std::borrow::Cow;
use std::fmt::Write;

pub fn register_builtin(builder: TemplateRegistryBuilder) -> TemplateRegistryBuilder {
    builder
        .register(ProjectType::Portfolio, "default", portfolio::default)
        .register(ProjectType::Portfolio, "minimal", portfolio::minimal)
        .register(ProjectType::Portfolio, "bento", portfolio::bento)
        .register(ProjectType::Portfolio, "neo-brutalist", portfolio::neo_brutalist)
        .register(ProjectType::Portfolio, "glass", portfolio::glass)
        .register(ProjectType::Portfolio, "cyber", portfolio::cyber)
        .register(ProjectType::Portfolio, "newspaper", portfolio::newspaper)
        .register(ProjectType::Portfolio, "kinetic", portfolio::kinetic)
        .register(ProjectType::Portfolio, "vaporware", portfolio::vaporware)
        .register(ProjectType::Biz, "biz-default", biz::default)
        .register(ProjectType::Biz, "biz-cyber", biz::cyber)
        .register(ProjectType::Biz, "biz-retro", biz::retro)
        .register(ProjectType::Links, "linktree-default", links::default)
}

const BASE_CSS: &str = "\
*,*::before,*::after{box-sizing:border-box}\
body{margin:0;background:var(--background);color:var(--foreground);\
font-family:var(--font-sans);letter-spacing:var(--letter-spacing);line-height:1.6}\
a{color:var(--primary)}\
.container{max-width:64rem;margin:0 auto;padding:calc(var(--spacing)*8) calc(var(--spacing)*6)}\
.card{background:var(--card);color:var(--card-foreground);border:1px solid var(--border);\
border-radius:var(--radius);box-shadow:var(--shadow-sm);padding:calc(var(--spacing)*5)}\
.muted{color:var(--muted-foreground)}\
.chip{display:inline-block;background:var(--secondary);color:var(--secondary-foreground);\
border-radius:calc(var(--radius) - 2px);padding:0.15rem 0.6rem;margin:0 0.35rem 0.35rem 0;font-size:0.85rem}\
.button{display:inline-block;background:var(--primary);color:var(--primary-foreground);\
border-radius:var(--radius);padding:0.6rem 1.1rem;text-decoration:none;box-shadow:var(--shadow)}\
.mode-toggle{position:fixed;top:1rem;right:1rem;font-size:0.85rem;text-decoration:none;\
background:var(--muted);color:var(--muted-foreground);border-radius:999px;padding:0.3rem 0.8rem}\
section{margin-top:calc(var(--spacing)*12)}\
h1,h2,h3{line-height:1.2}";

/// Escape text content.
pub(crate) fn esc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape a double-quoted attribute value.
pub(crate) fn attr(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Only web, mail and phone links survive; anything else becomes `#`.
pub(crate) fn safe_href(url: &str) -> Cow<'_, str> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        || (trimmed.starts_with('/') && !trimmed.starts_with("//"))
        || trimmed.starts_with('#')
        || trimmed.starts_with('?');
    if allowed {
        attr(trimmed)
    } else {
        Cow::Borrowed("#")
    }
}

/// Present and not blank.
pub(crate) fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Theme values go into a `<style>` block; drop anything that could end
/// the declaration or the element.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect()
}

fn root_block(styles: &ThemeStyles) -> String {
    let mut css = String::from(":root{");
    for (name, value) in styles.iter() {
        let _ = write!(css, "{}:{};", name, css_value(value));
    }
    css.push('}');
    css
}

pub(crate) fn mode_toggle(ctx: &TemplateContext<'_>) -> String {
    let label = match ctx.mode.toggled() {
        Mode::Dark => "Dark mode",
        Mode::Light => "Light mode",
    };
    format!(
        "<a class=\"mode-toggle\" href=\"{}\">{}</a>",
        safe_href(&ctx.mode_toggle_href()),
        label
    )
}

/// Wrap a layout body in the shared document shell.
pub(crate) fn page(
    meta: &PageMeta,
    styles: &ThemeStyles,
    mode: Mode,
    layout: &str,
    layout_css: &str,
    body: &str,
) -> Document {
    let mut html = String::with_capacity(body.len() + 4096);
    let html_class = if mode == Mode::Dark { " class=\"dark\"" } else { "" };

    let _ = write!(html, "<!DOCTYPE html><html lang=\"en\"{}>", html_class);
    html.push_str("<head><meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    let _ = write!(html, "<title>{}</title>", esc(&meta.title));
    let _ = write!(
        html,
        "<meta name=\"description\" content=\"{}\">",
        attr(&meta.description)
    );
    let _ = write!(
        html,
        "<meta property=\"og:title\" content=\"{}\">\
         <meta property=\"og:description\" content=\"{}\">\
         <meta property=\"og:site_name\" content=\"{}\">\
         <meta property=\"og:type\" content=\"website\">\
         <meta property=\"og:image\" content=\"{}\">",
        attr(&meta.title),
        attr(&meta.description),
        attr(&meta.site_name),
        attr(&meta.og_image)
    );
    if let Some(url) = &meta.canonical_url {
        let _ = write!(
            html,
            "<link rel=\"canonical\" href=\"{0}\"><meta property=\"og:url\" content=\"{0}\">",
            attr(url)
        );
    }
    let _ = write!(
        html,
        "<meta name=\"twitter:card\" content=\"summary_large_image\">\
         <meta name=\"twitter:title\" content=\"{}\">\
         <meta name=\"twitter:description\" content=\"{}\">\
         <meta name=\"twitter:image\" content=\"{}\">",
        attr(&meta.title),
        attr(&meta.description),
        attr(&meta.og_image)
    );
    let _ = write!(
        html,
        "<style>{}html{{color-scheme:{}}}{}{}</style></head>",
        root_block(styles),
        mode,
        BASE_CSS,
        layout_css
    );
    let _ = write!(
        html,
        "<body class=\"layout-{}\" data-mode=\"{}\">{}</body></html>",
        attr(layout),
        mode,
        body
    );

    Document::new(html)
}

pub(crate) fn page_for(ctx: &TemplateContext<'_>, layout: &str, layout_css: &str, body: &str) -> Document {
    page(ctx.meta, ctx.theme_styles, ctx.mode, layout, layout_css, body)
}

pub(crate) fn error_page(state: &SiteErrorState, meta: &PageMeta, styles: &ThemeStyles) -> Document {
    let body = format!(
        "<main class=\"container error-state\" data-state=\"{}\">\
         <div class=\"card\"><p class=\"muted\">{}</p><h1>{}</h1><p>{}</p>\
         <a class=\"button\" href=\"/\">Go to Kislap</a></div></main>",
        state.as_str(),
        state.status_code(),
        esc(state.title()),
        esc(state.message())
    );
    page(
        meta,
        styles,
        Mode::Light,
        "error",
        ".error-state{min-height:100vh;display:flex;align-items:center;justify-content:center;text-align:center}",
        &body,
    )
}

/// Served on the root domain itself.
pub(crate) fn landing_page(root_domain: &str) -> Document {
    let meta = PageMeta {
        title: "Kislap".to_string(),
        description: "Turn simple forms into stunning websites.".to_string(),
        site_name: "Kislap - Turn simple forms into stunning websites.".to_string(),
        canonical_url: Some(format!("https://{}", root_domain)),
        og_image: crate::core::meta::DEFAULT_OG_IMAGE.to_string(),
    };
    let styles = crate::core::theme::resolve_theme_styles(
        None,
        Mode::Light,
        crate::core::color::ColorFormat::Oklch,
    );
    let body = format!(
        "<main class=\"container landing\"><h1>Kislap</h1>\
         <p class=\"muted\">Turn simple forms into stunning websites.</p>\
         <p>Published sites live at <code>your-name.{}</code>.</p></main>",
        esc(root_domain)
    );
    page(
        &meta,
        &styles,
        Mode::Light,
        "landing",
        ".landing{text-align:center;padding-top:calc(var(--spacing)*24)}",
        &body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorFormat;
    use crate::core::theme::resolve_theme_styles;

    #[test]
    fn test_safe_href_rejects_scripts() {
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href(" JavaScript:alert(1)"), "#");
        assert_eq!(safe_href("//evil.example"), "#");
        assert_eq!(safe_href("https://kislap.app/a?b=1&c=2"), "https://kislap.app/a?b=1&amp;c=2");
        assert_eq!(safe_href("mailto:jane@example.com"), "mailto:jane@example.com");
        assert_eq!(safe_href("?mode=dark"), "?mode=dark");
        assert_eq!(safe_href("/contact"), "/contact");
    }

    #[test]
    fn test_shell_writes_theme_and_metadata() {
        let styles = resolve_theme_styles(None, Mode::Dark, ColorFormat::Oklch);
        let meta = PageMeta::for_error("A <b> title", "desc \"quoted\"");
        let doc = page(&meta, &styles, Mode::Dark, "biz-default", "", "<p>hi</p>");
        let html = doc.as_str();

        assert!(html.contains("<html lang=\"en\" class=\"dark\">"));
        assert!(html.contains("<title>A &lt;b&gt; title</title>"));
        assert!(html.contains("content=\"desc &quot;quoted&quot;\""));
        assert!(html.contains(":root{"));
        assert!(html.contains("--background:oklch("));
        assert!(html.contains("--radius:0.625rem;"));
        assert!(html.contains("--shadow-sm:"));
        assert!(html.contains("class=\"layout-biz-default\""));
    }

    #[test]
    fn test_css_values_cannot_break_out() {
        assert_eq!(css_value("red;}</style><script>"), "red/stylescript");
    }
}
