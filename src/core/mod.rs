pub mod color;
pub mod dispatcher;
pub mod meta;
pub mod og_image;
pub mod shadow;
pub mod site;
pub mod tenant;
pub mod theme;

pub use crate::domain::ports::ProjectSource;
pub use crate::utils::error::{FetchError, Result};
pub use dispatcher::{Document, TemplateContext, TemplateRegistry};
pub use og_image::OgCard;
pub use site::{SiteEngine, SiteErrorState, SiteOutcome};
pub use tenant::{HostResolver, TenantResolution};
pub use theme::{resolve_theme_styles, ThemeStyles};
