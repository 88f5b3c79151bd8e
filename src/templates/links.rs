//! Link-in-bio layout.

use super::{attr, esc, filled, mode_toggle, page_for, safe_href};
use crate::core::dispatcher::{Document, TemplateContext};
use crate::domain::model::{Linktree, ProjectContent};
use std::fmt::Write;

const CSS: &str = ".container{max-width:32rem;text-align:center}\
.avatar{width:6rem;height:6rem;border-radius:999px;object-fit:cover;box-shadow:var(--shadow-md)}\
.links{list-style:none;padding:0;display:flex;flex-direction:column;gap:calc(var(--spacing)*3)}\
.links a{display:flex;align-items:center;gap:0.75rem;text-decoration:none;color:var(--card-foreground)}\
.links a:hover{box-shadow:var(--shadow-lg)}.links img{width:2.5rem;height:2.5rem;border-radius:calc(var(--radius) - 4px)}";

pub fn default(ctx: &TemplateContext<'_>) -> Document {
    let empty = Linktree::default();
    let linktree = match ctx.content {
        ProjectContent::Links(linktree) => linktree,
        _ => &empty,
    };
    let name = if linktree.name.trim().is_empty() {
        ctx.project.name.as_str()
    } else {
        linktree.name.trim()
    };

    let mut body = mode_toggle(ctx);
    body.push_str("<main class=\"container\"><header>");
    if let Some(logo) = filled(&linktree.logo_url) {
        let _ = write!(
            body,
            "<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
            safe_href(logo),
            attr(name)
        );
    }
    let _ = write!(body, "<h1>{}</h1>", esc(name));
    if let Some(tagline) = filled(&linktree.tagline) {
        let _ = write!(body, "<p class=\"muted\">{}</p>", esc(tagline));
    }
    body.push_str("</header><ul class=\"links\">");

    let mut links: Vec<_> = linktree
        .links
        .iter()
        .filter(|link| !link.url.trim().is_empty())
        .collect();
    links.sort_by_key(|link| link.placement_order);

    for link in links {
        let _ = write!(
            body,
            "<li><a class=\"card\" href=\"{}\" rel=\"noopener\" target=\"_blank\">",
            safe_href(&link.url)
        );
        if let Some(image) = filled(&link.image_url) {
            let _ = write!(body, "<img src=\"{}\" alt=\"\">", safe_href(image));
        }
        let title = if link.title.trim().is_empty() {
            link.url.as_str()
        } else {
            link.title.as_str()
        };
        let _ = write!(body, "<span><strong>{}</strong>", esc(title));
        if let Some(description) = filled(&link.description) {
            let _ = write!(body, "<br><small class=\"muted\">{}</small>", esc(description));
        }
        body.push_str("</span></a></li>");
    }

    body.push_str("</ul></main>");
    page_for(ctx, "linktree-default", CSS, &body)
}
