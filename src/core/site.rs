use crate::core::color::ColorFormat;
use crate::core::dispatcher::{Document, TemplateRegistry};
use crate::core::meta::PageMeta;
use crate::core::og_image::OgCard;
use crate::core::tenant::{is_valid_label, TenantResolution};
use crate::core::theme::resolve_theme_styles;
use crate::domain::model::ProjectType;
use crate::domain::ports::ProjectSource;
use crate::domain::theme::Mode;
use crate::templates;
use std::sync::Arc;

/// The only three ways a public site can fail to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteErrorState {
    InvalidDomain,
    NotFound,
    NotPublished,
}

impl SiteErrorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteErrorState::InvalidDomain => "invalid-domain",
            SiteErrorState::NotFound => "not-found",
            SiteErrorState::NotPublished => "not-published",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            SiteErrorState::InvalidDomain => 400,
            SiteErrorState::NotFound => 404,
            SiteErrorState::NotPublished => 403,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SiteErrorState::InvalidDomain => "Invalid domain",
            SiteErrorState::NotFound => "Site not found",
            SiteErrorState::NotPublished => "Site not published",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SiteErrorState::InvalidDomain => {
                "This address does not point to a Kislap site. Check the URL and try again."
            }
            SiteErrorState::NotFound => {
                "We couldn't find a site at this address. It may have been moved or deleted."
            }
            SiteErrorState::NotPublished => {
                "This site exists but hasn't been published yet. Check back soon."
            }
        }
    }

    /// Styled with the default theme so it never depends on tenant data.
    pub fn render(&self) -> Document {
        let meta = PageMeta::for_error(self.title(), self.message());
        let styles = resolve_theme_styles(None, Mode::Light, ColorFormat::Oklch);
        templates::error_page(self, &meta, &styles)
    }
}

/// Result of one pass through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteOutcome {
    Rendered(Document),
    Error(SiteErrorState),
    /// The project names a layout no template is registered for.
    TemplateMissing {
        project_type: ProjectType,
        layout: Option<String>,
    },
}

impl SiteOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            SiteOutcome::Rendered(_) => 200,
            SiteOutcome::Error(state) => state.status_code(),
            SiteOutcome::TemplateMissing { .. } => 500,
        }
    }
}

/// Tenant → fetched project → compiled theme → rendered template.
pub struct SiteEngine<S: ProjectSource> {
    source: S,
    registry: Arc<TemplateRegistry>,
    color_format: ColorFormat,
    root_domain: String,
}

impl<S: ProjectSource> SiteEngine<S> {
    pub fn new(
        source: S,
        registry: Arc<TemplateRegistry>,
        color_format: ColorFormat,
        root_domain: &str,
    ) -> Self {
        Self {
            source,
            registry,
            color_format,
            root_domain: root_domain.to_string(),
        }
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Entry point for a request: the tenant comes from the host, never the path.
    pub async fn render_resolution(&self, resolution: &TenantResolution, mode: Mode) -> SiteOutcome {
        match resolution.tenant_id.as_deref() {
            Some(tenant_id) => self.render_tenant(tenant_id, mode).await,
            None => SiteOutcome::Error(SiteErrorState::InvalidDomain),
        }
    }

    /// Preview card for a published tenant; anything else gets the not-found card.
    pub async fn og_card(&self, tenant_id: &str) -> OgCard {
        let tenant_id = tenant_id.trim().to_ascii_lowercase();
        if !is_valid_label(&tenant_id) {
            return OgCard::not_found();
        }
        match self.source.fetch_project_by_tenant(&tenant_id).await {
            Some(project) if project.published => {
                OgCard::for_project(&project, &tenant_id, &self.root_domain)
            }
            _ => OgCard::not_found(),
        }
    }

    pub async fn render_tenant(&self, tenant_id: &str, mode: Mode) -> SiteOutcome {
        let tenant_id = tenant_id.trim().to_ascii_lowercase();
        if !is_valid_label(&tenant_id) {
            return SiteOutcome::Error(SiteErrorState::InvalidDomain);
        }

        let Some(project) = self.source.fetch_project_by_tenant(&tenant_id).await else {
            return SiteOutcome::Error(SiteErrorState::NotFound);
        };

        if !project.published {
            tracing::debug!(tenant = %tenant_id, "Project exists but is not published");
            return SiteOutcome::Error(SiteErrorState::NotPublished);
        }

        let theme = project.theme();
        let theme_styles = resolve_theme_styles(theme.as_ref(), mode, self.color_format);
        let meta = PageMeta::for_project(&project, &tenant_id, &self.root_domain);
        let on_mode_change = |target: Mode| format!("?mode={}", target);

        match self
            .registry
            .render(&project, mode, &theme_styles, &on_mode_change, &meta)
        {
            Some(document) => {
                tracing::debug!(
                    tenant = %tenant_id,
                    project_type = %project.project_type(),
                    layout = project.resolved_layout().unwrap_or("-"),
                    "Rendered site"
                );
                SiteOutcome::Rendered(document)
            }
            None => {
                let layout = project.resolved_layout().map(str::to_string);
                tracing::error!(
                    tenant = %tenant_id,
                    project_type = %project.project_type(),
                    layout = layout.as_deref().unwrap_or("-"),
                    "No template registered for project layout"
                );
                SiteOutcome::TemplateMissing {
                    project_type: project.project_type(),
                    layout,
                }
            }
        }
    }
}
