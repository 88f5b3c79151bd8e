use crate::domain::theme::ThemeObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Portfolio,
    Biz,
    Links,
    Waitlist,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Portfolio => "portfolio",
            ProjectType::Biz => "biz",
            ProjectType::Links => "links",
            ProjectType::Waitlist => "waitlist",
        }
    }

    /// Layout used when the sub-entity does not name one. Waitlists have no
    /// templates at all.
    pub fn default_layout(&self) -> Option<&'static str> {
        match self {
            ProjectType::Portfolio => Some("default"),
            ProjectType::Biz => Some("biz-default"),
            ProjectType::Links => Some("linktree-default"),
            ProjectType::Waitlist => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Portfolio => "Portfolio",
            ProjectType::Biz => "Business",
            ProjectType::Links => "Links",
            ProjectType::Waitlist => "Waitlist",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("project declares type '{0}' but carries no matching payload")]
    MissingContent(ProjectType),
}

/// A tenant project as returned by the project API at the `full` detail level.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawProject")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub sub_domain: Option<String>,
    pub description: Option<String>,
    pub og_image_url: Option<String>,
    pub published: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub content: ProjectContent,
}

/// The type-specific half of a project. Exactly one variant per project type.
#[derive(Debug, Clone)]
pub enum ProjectContent {
    Portfolio(Portfolio),
    Biz(Biz),
    Links(Linktree),
    Waitlist,
}

impl ProjectContent {
    pub fn project_type(&self) -> ProjectType {
        match self {
            ProjectContent::Portfolio(_) => ProjectType::Portfolio,
            ProjectContent::Biz(_) => ProjectType::Biz,
            ProjectContent::Links(_) => ProjectType::Links,
            ProjectContent::Waitlist => ProjectType::Waitlist,
        }
    }

    /// The explicitly chosen layout, ignoring blank values.
    pub fn layout_name(&self) -> Option<&str> {
        let layout = match self {
            ProjectContent::Portfolio(p) => p.layout_name.as_deref(),
            ProjectContent::Biz(b) => b.layout_name.as_deref(),
            ProjectContent::Links(l) => l.layout_name.as_deref(),
            ProjectContent::Waitlist => None,
        };
        layout.map(str::trim).filter(|name| !name.is_empty())
    }

    pub fn theme_object(&self) -> Option<&Value> {
        match self {
            ProjectContent::Portfolio(p) => p.theme_object.as_ref(),
            ProjectContent::Biz(b) => b.theme_object.as_ref(),
            ProjectContent::Links(l) => l.theme_object.as_ref(),
            ProjectContent::Waitlist => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        let name = match self {
            ProjectContent::Portfolio(p) => Some(p.name.as_str()),
            ProjectContent::Biz(b) => Some(b.name.as_str()),
            ProjectContent::Links(l) => Some(l.name.as_str()),
            ProjectContent::Waitlist => None,
        };
        name.filter(|n| !n.trim().is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        let description = match self {
            ProjectContent::Portfolio(p) => p.introduction.as_deref().or(p.about.as_deref()),
            ProjectContent::Biz(b) => b.description.as_deref().or(b.tagline.as_deref()),
            ProjectContent::Links(l) => l.tagline.as_deref(),
            ProjectContent::Waitlist => None,
        };
        description.filter(|d| !d.trim().is_empty())
    }
}

impl Project {
    pub fn project_type(&self) -> ProjectType {
        self.content.project_type()
    }

    /// Layout to dispatch on: the chosen one, else the type default.
    pub fn resolved_layout(&self) -> Option<&str> {
        self.content
            .layout_name()
            .or_else(|| self.project_type().default_layout())
    }

    /// The saved theme, if one was ever stored and can be decoded.
    pub fn theme(&self) -> Option<ThemeObject> {
        self.content.theme_object().and_then(ThemeObject::from_value)
    }
}

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    sub_domain: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    og_image_url: Option<String>,
    #[serde(rename = "type")]
    project_type: ProjectType,
    #[serde(default, deserialize_with = "flexible_bool")]
    published: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    portfolio: Option<Portfolio>,
    #[serde(default)]
    biz: Option<Biz>,
    #[serde(default)]
    linktree: Option<Linktree>,
}

impl TryFrom<RawProject> for Project {
    type Error = ModelError;

    fn try_from(raw: RawProject) -> Result<Self, Self::Error> {
        let content = match raw.project_type {
            ProjectType::Portfolio => raw
                .portfolio
                .map(ProjectContent::Portfolio)
                .ok_or(ModelError::MissingContent(ProjectType::Portfolio))?,
            ProjectType::Biz => raw
                .biz
                .map(ProjectContent::Biz)
                .ok_or(ModelError::MissingContent(ProjectType::Biz))?,
            ProjectType::Links => raw
                .linktree
                .map(ProjectContent::Links)
                .ok_or(ModelError::MissingContent(ProjectType::Links))?,
            ProjectType::Waitlist => ProjectContent::Waitlist,
        };

        Ok(Project {
            id: raw.id,
            name: raw.name,
            slug: raw.slug,
            sub_domain: raw.sub_domain,
            description: raw.description,
            og_image_url: raw.og_image_url,
            published: raw.published,
            updated_at: raw.updated_at,
            content,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    pub id: u64,
    pub name: String,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub introduction: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub layout_name: Option<String>,
    pub theme_object: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub work_experiences: Vec<WorkExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub showcases: Vec<Showcase>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub company: String,
    pub role: String,
    pub url: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Education {
    pub school: String,
    pub level: Option<String>,
    pub degree: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year_start: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub year_end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Showcase {
    pub name: String,
    pub description: Option<String>,
    pub role: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<Technology>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Technology {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Biz {
    pub id: u64,
    pub name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub services_enabled: bool,
    pub products_enabled: bool,
    pub booking_enabled: bool,
    pub ordering_enabled: bool,
    pub layout_name: Option<String>,
    pub theme_object: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<Service>,
    #[serde(deserialize_with = "null_as_default")]
    pub products: Vec<Product>,
    #[serde(deserialize_with = "null_as_default")]
    pub testimonials: Vec<Testimonial>,
    #[serde(deserialize_with = "null_as_default")]
    pub social_links: Vec<SocialLink>,
    #[serde(deserialize_with = "null_as_default")]
    pub faqs: Vec<Faq>,
    #[serde(deserialize_with = "null_as_default")]
    pub gallery: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i64,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub placement_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Product {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub placement_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub author: String,
    pub rating: i64,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Faq {
    pub question: String,
    pub answer: String,
    pub placement_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub image_url: Option<String>,
    pub placement_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Linktree {
    pub id: u64,
    pub name: String,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub layout_name: Option<String>,
    pub theme_object: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<LinktreeLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinktreeLink {
    pub placement_order: i64,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Go serialises empty slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `published` has been sent both as a boolean and as a 0/1 integer.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_portfolio_payload_decodes_into_portfolio_variant() {
        let project: Project = serde_json::from_value(json!({
            "id": 7,
            "name": "Jane",
            "slug": "jane",
            "sub_domain": "jane",
            "type": "portfolio",
            "published": true,
            "portfolio": {
                "name": "Jane Doe",
                "layout_name": "bento",
                "work_experiences": null,
                "skills": [{"name": "Rust"}]
            },
            "biz": null
        }))
        .unwrap();

        assert_eq!(project.project_type(), ProjectType::Portfolio);
        assert_eq!(project.resolved_layout(), Some("bento"));
        match &project.content {
            ProjectContent::Portfolio(p) => {
                assert!(p.work_experiences.is_empty());
                assert_eq!(p.skills[0].name, "Rust");
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn test_published_accepts_integers() {
        let project: Project = serde_json::from_value(json!({
            "type": "biz",
            "published": 0,
            "biz": {"name": "Acme"}
        }))
        .unwrap();
        assert!(!project.published);

        let project: Project = serde_json::from_value(json!({
            "type": "biz",
            "published": 1,
            "biz": {"name": "Acme"}
        }))
        .unwrap();
        assert!(project.published);
    }

    #[test]
    fn test_missing_sub_entity_is_rejected() {
        let result = serde_json::from_value::<Project>(json!({
            "type": "biz",
            "published": true,
            "portfolio": {"name": "wrong one"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_layout_falls_back_to_type_default() {
        let project: Project = serde_json::from_value(json!({
            "type": "biz",
            "published": true,
            "biz": {"name": "Acme", "layout_name": "   "}
        }))
        .unwrap();
        assert_eq!(project.resolved_layout(), Some("biz-default"));

        let waitlist: Project =
            serde_json::from_value(json!({"type": "waitlist", "published": true})).unwrap();
        assert_eq!(waitlist.resolved_layout(), None);
    }

    #[test]
    fn test_bad_timestamp_does_not_fail_decoding() {
        let project: Project = serde_json::from_value(json!({
            "type": "links",
            "published": true,
            "updated_at": "yesterday",
            "linktree": {"name": "Jane", "links": null}
        }))
        .unwrap();
        assert!(project.updated_at.is_none());
        assert_eq!(project.resolved_layout(), Some("linktree-default"));
    }
}
