//! Business layouts.

use super::{attr, esc, filled, mode_toggle, page_for, safe_href};
use crate::core::dispatcher::{Document, TemplateContext};
use crate::domain::model::{Biz, ProjectContent};
use std::fmt::Write;

struct Style {
    layout: &'static str,
    css: &'static str,
    /// Prefix for section headings.
    heading_mark: &'static str,
}

const DEFAULT: Style = Style {
    layout: "biz-default",
    css: ".hero{padding:calc(var(--spacing)*20) 0;text-align:center}\
          .tiles{display:grid;grid-template-columns:repeat(auto-fit,minmax(15rem,1fr));gap:1rem}\
          .price{font-weight:600;color:var(--primary)}",
    heading_mark: "",
};

const CYBER: Style = Style {
    layout: "biz-cyber",
    css: "body{font-family:var(--font-mono)}.hero{border-bottom:1px solid var(--primary);padding:4rem 0}\
          h1,h2{color:var(--primary);text-shadow:0 0 10px var(--primary)}\
          .tiles{display:grid;grid-template-columns:repeat(auto-fit,minmax(15rem,1fr));gap:1rem}\
          .card{border-color:var(--primary)}.price{color:var(--accent-foreground)}",
    heading_mark: "&gt; ",
};

const RETRO: Style = Style {
    layout: "biz-retro",
    css: "body{font-family:var(--font-serif)}.hero{text-align:center;border:4px double var(--foreground);padding:3rem}\
          .card{border:2px solid var(--foreground);border-radius:0;box-shadow:4px 4px 0 var(--foreground)}\
          .tiles{display:grid;grid-template-columns:repeat(auto-fit,minmax(14rem,1fr));gap:1.25rem}",
    heading_mark: "&#9733; ",
};

pub fn default(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &DEFAULT)
}

pub fn cyber(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &CYBER)
}

pub fn retro(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &RETRO)
}

fn render(ctx: &TemplateContext<'_>, style: &Style) -> Document {
    let empty = Biz::default();
    let biz = match ctx.content {
        ProjectContent::Biz(biz) => biz,
        _ => &empty,
    };

    let name = if biz.name.trim().is_empty() {
        ctx.project.name.as_str()
    } else {
        biz.name.trim()
    };

    let mut body = mode_toggle(ctx);
    body.push_str("<main class=\"container\">");
    let _ = write!(body, "<header class=\"hero\"><h1>{}</h1>", esc(name));
    if let Some(tagline) = filled(&biz.tagline) {
        let _ = write!(body, "<p class=\"lead\">{}</p>", esc(tagline));
    }
    if let Some(description) = filled(&biz.description) {
        let _ = write!(body, "<p class=\"muted\">{}</p>", esc(description));
    }
    body.push_str("</header>");

    for section in [
        services(biz, style),
        products(biz, style),
        gallery(biz, style),
        testimonials(biz, style),
        faqs(biz, style),
        contact(biz, style),
    ]
    .into_iter()
    .flatten()
    {
        body.push_str(&section);
    }

    let _ = write!(
        body,
        "<footer class=\"muted\"><small>&copy; {}</small></footer></main>",
        esc(name)
    );

    page_for(ctx, style.layout, style.css, &body)
}

fn heading(style: &Style, id: &str, title: &str) -> String {
    format!(
        "<section id=\"{}\"><h2>{}{}</h2>",
        id, style.heading_mark, title
    )
}

/// Prices arrive as floats; show whole amounts without decimals.
fn price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("₱{:.0}", value)
    } else {
        format!("₱{:.2}", value)
    }
}

fn sort_key(order: Option<i64>) -> i64 {
    order.unwrap_or(i64::MAX)
}

fn services(biz: &Biz, style: &Style) -> Option<String> {
    if !biz.services_enabled || biz.services.is_empty() {
        return None;
    }
    let mut services: Vec<_> = biz.services.iter().collect();
    // featured first, then by placement
    services.sort_by_key(|s| (!s.is_featured, sort_key(s.placement_order)));

    let mut html = heading(style, "services", "Services");
    html.push_str("<div class=\"tiles\">");
    for service in services {
        let _ = write!(html, "<article class=\"card\"><h3>{}</h3>", esc(&service.name));
        if let Some(description) = filled(&service.description) {
            let _ = write!(html, "<p>{}</p>", esc(description));
        }
        let _ = write!(html, "<p class=\"price\">{}", price(service.price));
        if service.duration_minutes > 0 {
            let _ = write!(html, " <span class=\"muted\">&middot; {} min</span>", service.duration_minutes);
        }
        html.push_str("</p></article>");
    }
    html.push_str("</div></section>");
    Some(html)
}

fn products(biz: &Biz, style: &Style) -> Option<String> {
    if !biz.products_enabled {
        return None;
    }
    let mut products: Vec<_> = biz.products.iter().filter(|p| p.is_active).collect();
    if products.is_empty() {
        return None;
    }
    products.sort_by_key(|p| sort_key(p.placement_order));

    let mut html = heading(style, "products", "Products");
    html.push_str("<div class=\"tiles\">");
    for product in products {
        html.push_str("<article class=\"card\">");
        if let Some(image) = filled(&product.image_url) {
            let _ = write!(
                html,
                "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                safe_href(image),
                attr(&product.name)
            );
        }
        let _ = write!(
            html,
            "<h3>{}</h3><p class=\"price\">{}</p>",
            esc(&product.name),
            price(product.price)
        );
        if product.stock <= 0 {
            html.push_str("<p class=\"muted\">Out of stock</p>");
        }
        html.push_str("</article>");
    }
    html.push_str("</div></section>");
    Some(html)
}

fn gallery(biz: &Biz, style: &Style) -> Option<String> {
    let mut images: Vec<_> = biz
        .gallery
        .iter()
        .filter_map(|g| filled(&g.image_url).map(|url| (sort_key(g.placement_order), url)))
        .collect();
    if images.is_empty() {
        return None;
    }
    images.sort_by_key(|(order, _)| *order);

    let mut html = heading(style, "gallery", "Gallery");
    html.push_str("<div class=\"tiles\">");
    for (_, url) in images {
        let _ = write!(html, "<img class=\"card\" src=\"{}\" alt=\"\" loading=\"lazy\">", safe_href(url));
    }
    html.push_str("</div></section>");
    Some(html)
}

fn testimonials(biz: &Biz, style: &Style) -> Option<String> {
    if biz.testimonials.is_empty() {
        return None;
    }
    let mut html = heading(style, "testimonials", "What customers say");
    html.push_str("<div class=\"tiles\">");
    for testimonial in &biz.testimonials {
        let stars = "★".repeat(testimonial.rating.clamp(0, 5) as usize);
        let _ = write!(
            html,
            "<blockquote class=\"card\"><p>{}</p><footer><span aria-label=\"{} out of 5\">{}</span> {}</footer></blockquote>",
            esc(filled(&testimonial.content).unwrap_or_default()),
            testimonial.rating.clamp(0, 5),
            stars,
            esc(&testimonial.author)
        );
    }
    html.push_str("</div></section>");
    Some(html)
}

fn faqs(biz: &Biz, style: &Style) -> Option<String> {
    if biz.faqs.is_empty() {
        return None;
    }
    let mut faqs: Vec<_> = biz.faqs.iter().collect();
    faqs.sort_by_key(|f| sort_key(f.placement_order));

    let mut html = heading(style, "faq", "FAQ");
    for faq in faqs {
        let _ = write!(
            html,
            "<details class=\"card\"><summary>{}</summary><p>{}</p></details>",
            esc(&faq.question),
            esc(&faq.answer)
        );
    }
    html.push_str("</section>");
    Some(html)
}

fn contact(biz: &Biz, style: &Style) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(address) = filled(&biz.address) {
        lines.push(format!("<p>{}</p>", esc(address)));
    }
    if let Some(phone) = filled(&biz.phone) {
        lines.push(format!("<p><a href=\"tel:{}\">{}</a></p>", attr(phone), esc(phone)));
    }
    if let Some(email) = filled(&biz.email) {
        lines.push(format!(
            "<p><a href=\"mailto:{}\">{}</a></p>",
            attr(email),
            esc(email)
        ));
    }
    if let Some(website) = filled(&biz.website) {
        lines.push(format!("<p><a href=\"{}\">{}</a></p>", safe_href(website), esc(website)));
    }
    let mut socials: Vec<String> = biz
        .social_links
        .iter()
        .filter(|link| !link.url.trim().is_empty())
        .map(|link| {
            format!(
                "<a class=\"chip\" href=\"{}\" rel=\"noopener\">{}</a>",
                safe_href(&link.url),
                esc(&link.platform)
            )
        })
        .collect();
    if let Some(instagram) = filled(&biz.instagram) {
        socials.push(format!(
            "<a class=\"chip\" href=\"{}\" rel=\"noopener\">Instagram</a>",
            safe_href(instagram)
        ));
    }
    if !socials.is_empty() {
        lines.push(format!("<p>{}</p>", socials.join("")));
    }
    if lines.is_empty() {
        return None;
    }

    let mut html = heading(style, "contact", "Visit us");
    let _ = write!(html, "<div class=\"card\">{}</div></section>", lines.join(""));
    Some(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorFormat;
    use crate::core::meta::PageMeta;
    use crate::core::theme::resolve_theme_styles;
    use crate::domain::model::Project;
    use crate::domain::theme::Mode;
    use serde_json::json;

    fn render_acme(f: fn(&TemplateContext<'_>) -> Document) -> String {
        let project: Project = serde_json::from_value(json!({
            "name": "acme",
            "type": "biz",
            "published": true,
            "biz": {
                "name": "Acme Bakery",
                "tagline": "Fresh & warm",
                "services_enabled": true,
                "products_enabled": true,
                "services": [
                    {"name": "Catering", "price": 1500.5, "placement_order": 2},
                    {"name": "Cake design", "price": 800, "is_featured": true, "duration_minutes": 30}
                ],
                "products": [
                    {"name": "Ensaymada", "price": 45, "stock": 10, "is_active": true},
                    {"name": "Retired bun", "price": 10, "stock": 0, "is_active": false}
                ],
                "faqs": null,
                "testimonials": [{"author": "Mara", "rating": 9, "content": "Best bread"}],
                "social_links": [{"platform": "Facebook", "url": "https://facebook.com/acme"}]
            }
        }))
        .unwrap();
        let styles = resolve_theme_styles(None, Mode::Light, ColorFormat::Hsl);
        let meta = PageMeta::for_project(&project, "acme", "kislap.app");
        let toggle = |m: Mode| format!("?mode={}", m);
        let ctx = TemplateContext {
            project: &project,
            content: &project.content,
            mode: Mode::Light,
            theme_styles: &styles,
            meta: &meta,
            on_mode_change: &toggle,
        };
        f(&ctx).into_string()
    }

    #[test]
    fn test_biz_default_sections() {
        let html = render_acme(default);
        assert!(html.contains("layout-biz-default"));
        assert!(html.contains("<h1>Acme Bakery</h1>"));
        assert!(html.contains("Fresh &amp; warm"));
        // featured service is listed first
        let cake = html.find("Cake design").unwrap();
        let catering = html.find("Catering").unwrap();
        assert!(cake < catering);
        assert!(html.contains("₱800"));
        assert!(html.contains("₱1500.50"));
        assert!(html.contains("Ensaymada"));
        assert!(!html.contains("Retired bun"));
        assert!(!html.contains("id=\"faq\""));
        assert!(html.contains("★★★★★</span> Mara"));
    }

    #[test]
    fn test_biz_variants() {
        assert!(render_acme(cyber).contains("<h2>&gt; Services</h2>"));
        assert!(render_acme(retro).contains("layout-biz-retro"));
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(price(45.0), "₱45");
        assert_eq!(price(12.5), "₱12.50");
    }
}
