//! Portfolio layouts. All nine share one renderer; a layout is a set of
//! section choices plus its own stylesheet.

use super::{attr, esc, filled, mode_toggle, page_for, safe_href};
use crate::core::dispatcher::{Document, TemplateContext};
use crate::domain::model::{Portfolio, ProjectContent};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hero {
    Centered,
    Split,
    Masthead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sections {
    /// Stacked one after another.
    Stacked,
    /// Tiles in a grid.
    Grid,
}

struct Variant {
    layout: &'static str,
    hero: Hero,
    sections: Sections,
    css: &'static str,
}

const DEFAULT: Variant = Variant {
    layout: "default",
    hero: Hero::Centered,
    sections: Sections::Stacked,
    css: ".hero{text-align:center;padding-top:calc(var(--spacing)*16)}",
};

const MINIMAL: Variant = Variant {
    layout: "minimal",
    hero: Hero::Split,
    sections: Sections::Stacked,
    css: ".container{max-width:44rem}.card{border:none;box-shadow:none;padding:0;background:transparent}\
          h2{font-size:0.8rem;text-transform:uppercase;letter-spacing:0.12em;color:var(--muted-foreground)}",
};

const BENTO: Variant = Variant {
    layout: "bento",
    hero: Hero::Split,
    sections: Sections::Grid,
    css: ".grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(16rem,1fr));gap:calc(var(--spacing)*4)}\
          .grid section{margin:0}.grid .wide{grid-column:1/-1}",
};

const NEO_BRUTALIST: Variant = Variant {
    layout: "neo-brutalist",
    hero: Hero::Masthead,
    sections: Sections::Grid,
    css: ".card{border:3px solid var(--foreground);border-radius:0;box-shadow:6px 6px 0 var(--foreground)}\
          .grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(18rem,1fr));gap:1.5rem}\
          .grid section{margin:0}.grid .wide{grid-column:1/-1}h1{font-size:3.5rem;text-transform:uppercase}",
};

const GLASS: Variant = Variant {
    layout: "glass",
    hero: Hero::Centered,
    sections: Sections::Grid,
    css: "body{background:linear-gradient(135deg,var(--primary),var(--accent))}\
          .card{background:color-mix(in oklab,var(--card) 60%,transparent);backdrop-filter:blur(16px)}\
          .grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(18rem,1fr));gap:1rem}\
          .grid section{margin:0}.grid .wide{grid-column:1/-1}",
};

const CYBER: Variant = Variant {
    layout: "cyber",
    hero: Hero::Masthead,
    sections: Sections::Stacked,
    css: "body{font-family:var(--font-mono)}h1,h2{color:var(--primary);text-shadow:0 0 12px var(--primary)}\
          .card{border-color:var(--primary);box-shadow:0 0 0 1px var(--primary),var(--shadow-lg)}",
};

const NEWSPAPER: Variant = Variant {
    layout: "newspaper",
    hero: Hero::Masthead,
    sections: Sections::Stacked,
    css: "body{font-family:var(--font-serif)}.masthead{border-bottom:4px double var(--foreground);text-align:center}\
          .card{border:none;border-top:1px solid var(--border);border-radius:0;box-shadow:none;background:transparent}\
          .about{column-count:2;column-gap:2rem}",
};

const KINETIC: Variant = Variant {
    layout: "kinetic",
    hero: Hero::Centered,
    sections: Sections::Stacked,
    css: "@keyframes rise{from{opacity:0;transform:translateY(1.5rem)}to{opacity:1;transform:none}}\
          section{animation:rise 0.6s ease-out both}h1{font-size:clamp(2.5rem,8vw,6rem)}",
};

const VAPORWARE: Variant = Variant {
    layout: "vaporware",
    hero: Hero::Centered,
    sections: Sections::Grid,
    css: "body{background:linear-gradient(180deg,var(--background),var(--accent))}\
          h1{font-style:italic;color:var(--primary);text-shadow:3px 3px 0 var(--accent)}\
          .grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(16rem,1fr));gap:1rem}\
          .grid section{margin:0}.grid .wide{grid-column:1/-1}",
};

pub fn default(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &DEFAULT)
}

pub fn minimal(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &MINIMAL)
}

pub fn bento(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &BENTO)
}

pub fn neo_brutalist(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &NEO_BRUTALIST)
}

pub fn glass(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &GLASS)
}

pub fn cyber(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &CYBER)
}

pub fn newspaper(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &NEWSPAPER)
}

pub fn kinetic(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &KINETIC)
}

pub fn vaporware(ctx: &TemplateContext<'_>) -> Document {
    render(ctx, &VAPORWARE)
}

fn render(ctx: &TemplateContext<'_>, variant: &Variant) -> Document {
    let empty = Portfolio::default();
    let portfolio = match ctx.content {
        ProjectContent::Portfolio(portfolio) => portfolio,
        _ => &empty,
    };

    let sections = [
        about(portfolio),
        experience(portfolio),
        showcases(portfolio),
        skills(portfolio),
        education(portfolio),
        contact(portfolio),
    ];

    let mut body = String::new();
    body.push_str(&mode_toggle(ctx));
    body.push_str("<main class=\"container\">");
    body.push_str(&hero(portfolio, &ctx.project.name, variant.hero));

    if variant.sections == Sections::Grid {
        body.push_str("<div class=\"grid\">");
    }
    for section in sections.into_iter().flatten() {
        body.push_str(&section);
    }
    if variant.sections == Sections::Grid {
        body.push_str("</div>");
    }

    let _ = write!(
        body,
        "<footer class=\"muted\"><small>&copy; {}</small></footer></main>",
        esc(display_name(portfolio, &ctx.project.name))
    );

    page_for(ctx, variant.layout, variant.css, &body)
}

fn display_name<'a>(portfolio: &'a Portfolio, fallback: &'a str) -> &'a str {
    let name = portfolio.name.trim();
    if name.is_empty() {
        fallback
    } else {
        name
    }
}

fn hero(portfolio: &Portfolio, fallback: &str, style: Hero) -> String {
    let name = esc(display_name(portfolio, fallback));
    let title = filled(&portfolio.job_title).map(esc).unwrap_or_default();
    let location = filled(&portfolio.location).map(esc).unwrap_or_default();
    let intro = filled(&portfolio.introduction).map(esc).unwrap_or_default();

    match style {
        Hero::Centered => format!(
            "<header class=\"hero\"><h1>{}</h1><p class=\"lead\">{}</p><p class=\"muted\">{}</p><p>{}</p></header>",
            name, title, location, intro
        ),
        Hero::Split => format!(
            "<header class=\"hero split\"><div><h1>{}</h1><p class=\"muted\">{}</p></div>\
             <div><p>{}</p><p class=\"muted\">{}</p></div></header>",
            name, title, intro, location
        ),
        Hero::Masthead => format!(
            "<header class=\"hero masthead\"><h1>{}</h1><p class=\"lead\">{} {}</p><p>{}</p></header>",
            name,
            title,
            if location.is_empty() {
                String::new()
            } else {
                format!("&middot; {}", location)
            },
            intro
        ),
    }
}

fn about(portfolio: &Portfolio) -> Option<String> {
    let about = filled(&portfolio.about)?;
    Some(format!(
        "<section id=\"about\" class=\"card about wide\"><h2>About</h2><p>{}</p></section>",
        esc(about)
    ))
}

fn experience(portfolio: &Portfolio) -> Option<String> {
    if portfolio.work_experiences.is_empty() {
        return None;
    }
    let mut html = String::from("<section id=\"experience\" class=\"card\"><h2>Experience</h2><ul>");
    for job in &portfolio.work_experiences {
        let company = match filled(&job.url) {
            Some(url) => format!("<a href=\"{}\">{}</a>", safe_href(url), esc(&job.company)),
            None => esc(&job.company).into_owned(),
        };
        let period = period(&job.start_date, &job.end_date, "Present");
        let _ = write!(
            html,
            "<li><h3>{} <span class=\"muted\">@ {}</span></h3><p class=\"muted\">{}</p>",
            esc(&job.role),
            company,
            esc(&period)
        );
        if let Some(about) = filled(&job.about) {
            let _ = write!(html, "<p>{}</p>", esc(about));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul></section>");
    Some(html)
}

fn showcases(portfolio: &Portfolio) -> Option<String> {
    if portfolio.showcases.is_empty() {
        return None;
    }
    let mut html = String::from("<section id=\"projects\" class=\"card wide\"><h2>Projects</h2>");
    for showcase in &portfolio.showcases {
        html.push_str("<article class=\"showcase\">");
        match filled(&showcase.url) {
            Some(url) => {
                let _ = write!(
                    html,
                    "<h3><a href=\"{}\">{}</a></h3>",
                    safe_href(url),
                    esc(&showcase.name)
                );
            }
            None => {
                let _ = write!(html, "<h3>{}</h3>", esc(&showcase.name));
            }
        }
        if let Some(role) = filled(&showcase.role) {
            let _ = write!(html, "<p class=\"muted\">{}</p>", esc(role));
        }
        if let Some(description) = filled(&showcase.description) {
            let _ = write!(html, "<p>{}</p>", esc(description));
        }
        for tech in showcase.technologies.iter().filter(|t| !t.name.trim().is_empty()) {
            let _ = write!(html, "<span class=\"chip\">{}</span>", esc(&tech.name));
        }
        html.push_str("</article>");
    }
    html.push_str("</section>");
    Some(html)
}

fn skills(portfolio: &Portfolio) -> Option<String> {
    let names: Vec<&str> = portfolio
        .skills
        .iter()
        .map(|s| s.name.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }
    let mut html = String::from("<section id=\"skills\" class=\"card\"><h2>Skills</h2><p>");
    for name in names {
        let _ = write!(html, "<span class=\"chip\">{}</span>", esc(name));
    }
    html.push_str("</p></section>");
    Some(html)
}

fn education(portfolio: &Portfolio) -> Option<String> {
    if portfolio.education.is_empty() {
        return None;
    }
    let mut html = String::from("<section id=\"education\" class=\"card\"><h2>Education</h2><ul>");
    for entry in &portfolio.education {
        let degree = [filled(&entry.degree), filled(&entry.level)]
            .into_iter()
            .flatten()
            .next()
            .unwrap_or_default();
        let _ = write!(
            html,
            "<li><h3>{}</h3><p>{}</p><p class=\"muted\">{}</p></li>",
            esc(&entry.school),
            esc(degree),
            esc(&period(&entry.year_start, &entry.year_end, ""))
        );
    }
    html.push_str("</ul></section>");
    Some(html)
}

fn contact(portfolio: &Portfolio) -> Option<String> {
    let mut links = Vec::new();
    if let Some(email) = filled(&portfolio.email) {
        links.push(format!(
            "<a class=\"button\" href=\"mailto:{}\">{}</a>",
            attr(email),
            esc(email)
        ));
    }
    if let Some(phone) = filled(&portfolio.phone) {
        links.push(format!("<a href=\"tel:{}\">{}</a>", attr(phone), esc(phone)));
    }
    for (label, url) in [
        ("Website", &portfolio.website),
        ("GitHub", &portfolio.github),
        ("LinkedIn", &portfolio.linkedin),
        ("Twitter", &portfolio.twitter),
    ] {
        if let Some(url) = filled(url) {
            links.push(format!("<a href=\"{}\" rel=\"noopener\">{}</a>", safe_href(url), label));
        }
    }
    if links.is_empty() {
        return None;
    }
    Some(format!(
        "<section id=\"contact\" class=\"card wide\"><h2>Contact</h2><p>{}</p></section>",
        links.join(" ")
    ))
}

fn period(start: &Option<String>, end: &Option<String>, open_end: &str) -> String {
    match (filled(start), filled(end)) {
        (Some(start), Some(end)) => format!("{} – {}", start, end),
        (Some(start), None) if !open_end.is_empty() => format!("{} – {}", start, open_end),
        (Some(start), None) => start.to_string(),
        (None, Some(end)) => end.to_string(),
        (None, None) => String::new(),
    }
}
