//! HTTP surface: host-based tenant routing in front of the site routes.

use crate::core::og_image::{OgCard, OG_IMAGE_PATH};
use crate::core::site::{SiteEngine, SiteErrorState, SiteOutcome};
use crate::core::tenant::{rewrite_path, HostResolver, TenantResolution};
use crate::domain::ports::ProjectSource;
use crate::domain::theme::Mode;
use crate::templates;
use crate::utils::error::{Result, SitesError};
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ModeQuery {
    mode: Option<String>,
}

impl ModeQuery {
    /// Unknown values fall back to light.
    pub fn mode(&self) -> Mode {
        self.mode
            .as_deref()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }
}

impl IntoResponse for SiteOutcome {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self {
            SiteOutcome::Rendered(document) => (status, Html(document.into_string())).into_response(),
            SiteOutcome::Error(state) => (status, Html(state.render().into_string())).into_response(),
            SiteOutcome::TemplateMissing { .. } => status.into_response(),
        }
    }
}

/// Routes served after host rewriting.
///
/// The `/sites` handlers read the tenant from the [`TenantResolution`] that
/// [`route_by_host`] attaches; the `{site}` segment is never trusted. Without
/// a resolved tenant they answer `not-found` (or `invalid-domain`).
pub fn build_router<S: ProjectSource + 'static>(engine: Arc<SiteEngine<S>>) -> Router {
    Router::new()
        .route("/", get(root_page::<S>))
        .route("/healthz", get(healthz))
        .route("/sites/{site}", get(site_page::<S>))
        .route("/sites/{site}/{*rest}", get(site_subpage::<S>))
        .fallback(fallback)
        .with_state(engine)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn root_page<S: ProjectSource + 'static>(
    State(engine): State<Arc<SiteEngine<S>>>,
    resolution: Option<Extension<TenantResolution>>,
) -> Response {
    match resolution {
        Some(Extension(resolution)) if resolution.is_invalid() => {
            SiteOutcome::Error(SiteErrorState::InvalidDomain).into_response()
        }
        _ => Html(templates::landing_page(engine.root_domain()).into_string()).into_response(),
    }
}

/// Only requests that came in on a tenant host may render a site.
fn host_tenant(
    resolution: Option<Extension<TenantResolution>>,
) -> std::result::Result<TenantResolution, SiteOutcome> {
    match resolution {
        Some(Extension(resolution)) if resolution.tenant_id.is_some() => Ok(resolution),
        Some(Extension(resolution)) if resolution.is_invalid() => {
            Err(SiteOutcome::Error(SiteErrorState::InvalidDomain))
        }
        _ => Err(SiteOutcome::Error(SiteErrorState::NotFound)),
    }
}

async fn site_page<S: ProjectSource + 'static>(
    State(engine): State<Arc<SiteEngine<S>>>,
    resolution: Option<Extension<TenantResolution>>,
    Query(query): Query<ModeQuery>,
) -> SiteOutcome {
    match host_tenant(resolution) {
        Ok(resolution) => engine.render_resolution(&resolution, query.mode()).await,
        Err(outcome) => outcome,
    }
}

/// Single-page sites: every sub-path renders the same page, except the
/// preview card.
async fn site_subpage<S: ProjectSource + 'static>(
    State(engine): State<Arc<SiteEngine<S>>>,
    Path((_site, rest)): Path<(String, String)>,
    resolution: Option<Extension<TenantResolution>>,
    query: Query<ModeQuery>,
) -> Response {
    if rest.trim_start_matches('/') == OG_IMAGE_PATH.trim_start_matches('/') {
        return og_image(engine, resolution).await;
    }
    site_page(State(engine), resolution, query).await.into_response()
}

async fn og_image<S: ProjectSource + 'static>(
    engine: Arc<SiteEngine<S>>,
    resolution: Option<Extension<TenantResolution>>,
) -> Response {
    let card = match host_tenant(resolution) {
        Ok(TenantResolution {
            tenant_id: Some(tenant_id),
            ..
        }) => engine.og_card(&tenant_id).await,
        Ok(_) => OgCard::not_found(),
        Err(outcome) => return outcome.into_response(),
    };

    match tokio::task::spawn_blocking(move || card.render_png()).await {
        Ok(Ok(png)) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            png,
        )
            .into_response(),
        Ok(Err(e)) => {
            tracing::error!("❌ Preview card failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!("❌ Preview card task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn fallback(resolution: Option<Extension<TenantResolution>>) -> SiteOutcome {
    match resolution {
        Some(Extension(resolution)) if resolution.is_invalid() => {
            SiteOutcome::Error(SiteErrorState::InvalidDomain)
        }
        _ => SiteOutcome::Error(SiteErrorState::NotFound),
    }
}

/// Host resolver plus the framing policy stamped on tenant responses.
#[derive(Debug, Clone)]
pub struct HostRouting {
    resolver: HostResolver,
    frame_policy: HeaderValue,
}

impl HostRouting {
    pub fn new(resolver: HostResolver) -> Result<Self> {
        let policy = format!(
            "frame-ancestors 'self' https://{0} https://*.{0};",
            resolver.root_domain()
        );
        let frame_policy = HeaderValue::from_str(&policy).map_err(|e| SitesError::ConfigError {
            message: format!("root domain cannot be used in a header: {}", e),
        })?;
        Ok(Self {
            resolver,
            frame_policy,
        })
    }

    pub fn resolver(&self) -> &HostResolver {
        &self.resolver
    }
}

fn rewrite_uri(uri: &Uri, tenant_id: &str) -> Option<Uri> {
    let path = rewrite_path(tenant_id, uri.path())?;
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };
    Uri::builder().path_and_query(path_and_query).build().ok()
}

/// Resolve the tenant from `Host` and rewrite the request into `/sites/{tenant}`.
/// Every rewritten response carries the frame policy.
pub async fn route_by_host(
    State(routing): State<Arc<HostRouting>>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default();
    let resolution = routing.resolver.resolve(host);

    let rewritten = resolution
        .tenant_id
        .as_deref()
        .and_then(|tenant| rewrite_uri(request.uri(), tenant));

    let is_rewritten = match rewritten {
        Some(uri) => {
            tracing::debug!(from = %request.uri(), to = %uri, "Rewriting tenant request");
            *request.uri_mut() = uri;
            true
        }
        None => {
            tracing::debug!(
                path = request.uri().path(),
                root = resolution.is_root_traffic,
                tenant = resolution.tenant_id.as_deref().unwrap_or("-"),
                "Passing request through"
            );
            false
        }
    };

    request.extensions_mut().insert(resolution);
    let mut response = next.run(request).await;
    if is_rewritten {
        response
            .headers_mut()
            .insert(header::CONTENT_SECURITY_POLICY, routing.frame_policy.clone());
    }
    response
}

/// The full application: host routing wrapped around [`build_router`].
///
/// The rewrite has to happen before route matching, so the site router is
/// mounted as the fallback service of an outer router that carries the
/// middleware.
pub fn app<S: ProjectSource + 'static>(engine: Arc<SiteEngine<S>>, routing: HostRouting) -> Router {
    Router::new()
        .fallback_service(build_router(engine))
        .layer(middleware::from_fn_with_state(Arc::new(routing), route_by_host))
}
