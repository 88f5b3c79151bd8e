use crate::core::og_image::OG_IMAGE_PATH;
use crate::domain::model::Project;

/// Platform-wide preview image for pages without a tenant.
pub const DEFAULT_OG_IMAGE: &str = "/og-image.png";
const SITE_TAGLINE: &str = "Kislap - Turn simple forms into stunning websites.";

/// `<head>` metadata for a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub canonical_url: Option<String>,
    pub og_image: String,
}

impl PageMeta {
    pub fn for_project(project: &Project, tenant_id: &str, root_domain: &str) -> Self {
        let fallback = format!("{} {}", project.name, project.project_type().label())
            .trim()
            .to_string();

        let title = project
            .content
            .display_name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.clone());
        let description = project
            .content
            .description()
            .or(project.description.as_deref().filter(|d| !d.trim().is_empty()))
            .map(str::to_string)
            .unwrap_or(fallback);

        let canonical_url = format!("https://{}.{}", tenant_id, root_domain);
        // uploaded image first, then the generated card
        let og_image = project
            .og_image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", canonical_url, OG_IMAGE_PATH));

        Self {
            title,
            description,
            site_name: format!("{} | {}", project.name, SITE_TAGLINE),
            canonical_url: Some(canonical_url),
            og_image,
        }
    }

    pub fn for_error(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            site_name: SITE_TAGLINE.to_string(),
            canonical_url: None,
            og_image: DEFAULT_OG_IMAGE.to_string(),
        }
    }
}
