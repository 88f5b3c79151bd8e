//! Template lookup by `(project type, layout name)`.
//!
//! The registry is assembled once at startup and shared read-only. The
//! dispatcher knows nothing about what a template draws; it resolves the
//! layout, finds the render function and calls it.

use crate::core::meta::PageMeta;
use crate::core::theme::ThemeStyles;
use crate::domain::model::{Project, ProjectContent, ProjectType};
use crate::domain::theme::Mode;
use std::collections::HashMap;
use std::fmt;

/// A rendered HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    html: String,
}

impl Document {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Everything a template receives.
pub struct TemplateContext<'a> {
    pub project: &'a Project,
    pub content: &'a ProjectContent,
    pub mode: Mode,
    pub theme_styles: &'a ThemeStyles,
    pub meta: &'a PageMeta,
    /// Returns the URL that switches the page to the given mode.
    pub on_mode_change: &'a dyn Fn(Mode) -> String,
}

impl TemplateContext<'_> {
    pub fn is_dark(&self) -> bool {
        self.mode == Mode::Dark
    }

    /// Link target for a light/dark toggle.
    pub fn mode_toggle_href(&self) -> String {
        (self.on_mode_change)(self.mode.toggled())
    }
}

pub type RenderFn = fn(&TemplateContext<'_>) -> Document;

#[derive(Default)]
pub struct TemplateRegistryBuilder {
    entries: HashMap<(ProjectType, String), RenderFn>,
}

impl TemplateRegistryBuilder {
    pub fn register(mut self, project_type: ProjectType, layout: &str, render: RenderFn) -> Self {
        self.entries.insert((project_type, layout.to_string()), render);
        self
    }

    pub fn build(self) -> TemplateRegistry {
        TemplateRegistry {
            entries: self.entries,
        }
    }
}

pub struct TemplateRegistry {
    entries: HashMap<(ProjectType, String), RenderFn>,
}

impl TemplateRegistry {
    pub fn builder() -> TemplateRegistryBuilder {
        TemplateRegistryBuilder::default()
    }

    /// Registry with every built-in template.
    pub fn standard() -> Self {
        crate::templates::register_builtin(Self::builder()).build()
    }

    pub fn lookup(&self, project_type: ProjectType, layout: &str) -> Option<RenderFn> {
        self.entries
            .get(&(project_type, layout.to_string()))
            .copied()
    }

    /// Registered layout names for one project type, sorted.
    pub fn layouts(&self, project_type: ProjectType) -> Vec<&str> {
        let mut layouts: Vec<&str> = self
            .entries
            .keys()
            .filter(|(t, _)| *t == project_type)
            .map(|(_, layout)| layout.as_str())
            .collect();
        layouts.sort_unstable();
        layouts
    }

    /// Render `project` with its chosen (or default) layout. `None` when no
    /// template matches; the caller decides how to report that.
    pub fn render(
        &self,
        project: &Project,
        mode: Mode,
        theme_styles: &ThemeStyles,
        on_mode_change: &dyn Fn(Mode) -> String,
        meta: &PageMeta,
    ) -> Option<Document> {
        let layout = project.resolved_layout()?;
        let render = self.lookup(project.project_type(), layout)?;

        let ctx = TemplateContext {
            project,
            content: &project.content,
            mode,
            theme_styles,
            meta,
            on_mode_change,
        };
        Some(render(&ctx))
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .map(|(t, layout)| format!("{}/{}", t, layout))
            .collect();
        keys.sort();
        f.debug_struct("TemplateRegistry").field("entries", &keys).finish()
    }
}
