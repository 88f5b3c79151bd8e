use crate::domain::model::Project;
use crate::domain::ports::ProjectSource;
use crate::utils::error::{FetchError, Result, SitesError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("kislap-sites/", env!("CARGO_PKG_VERSION"));

/// The project API wraps every payload in `{"data": …}`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    data: Option<Project>,
}

/// Fetches projects from `GET {base}/api/projects/show/sub-domain/{tenant}?level=full`.
pub struct ApiProjectSource {
    client: Client,
    base_url: Url,
}

impl ApiProjectSource {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(api_base_url).map_err(|e| SitesError::InvalidConfigValueError {
                field: "api_base_url".to_string(),
                value: api_base_url.to_string(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(SitesError::InvalidConfigValueError {
                field: "api_base_url".to_string(),
                value: api_base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SitesError::ConfigError {
                message: format!("could not build HTTP client: {}", e),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn project_url(&self, tenant_id: &str) -> std::result::Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["api", "projects", "show", "sub-domain", tenant_id]);
        url.query_pairs_mut().append_pair("level", "full");
        Ok(url)
    }
}

#[async_trait]
impl ProjectSource for ApiProjectSource {
    async fn fetch_project(&self, tenant_id: &str) -> std::result::Result<Project, FetchError> {
        let url = self.project_url(tenant_id)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;
        envelope.data.ok_or(FetchError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_url() {
        let source = ApiProjectSource::new("https://api.kislap.app", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.project_url("jane").unwrap().as_str(),
            "https://api.kislap.app/api/projects/show/sub-domain/jane?level=full"
        );

        let nested = ApiProjectSource::new("http://localhost:8080/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            nested.project_url("acme").unwrap().as_str(),
            "http://localhost:8080/v1/api/projects/show/sub-domain/acme?level=full"
        );
    }

    #[test]
    fn test_rejects_unusable_base() {
        assert!(ApiProjectSource::new("not a url", Duration::from_secs(5)).is_err());
        assert!(ApiProjectSource::new("mailto:ops@kislap.app", Duration::from_secs(5)).is_err());
    }
}
