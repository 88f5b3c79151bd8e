pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod templates;
pub mod utils;

pub use crate::adapters::http::ApiProjectSource;
pub use crate::adapters::server::{app, build_router, HostRouting};
pub use crate::config::SiteConfig;
pub use crate::core::{
    HostResolver, SiteEngine, SiteErrorState, SiteOutcome, TemplateRegistry, TenantResolution,
};
pub use crate::domain::theme::Mode;
pub use crate::utils::error::{FetchError, Result, SitesError};
