use crate::domain::model::Project;
use crate::utils::error::FetchError;
use async_trait::async_trait;

/// Where tenant projects come from. The production implementation talks to
/// the project API over HTTP.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn fetch_project(&self, tenant_id: &str) -> Result<Project, FetchError>;

    /// Public contract: any failure becomes `None`. The cause is only logged.
    async fn fetch_project_by_tenant(&self, tenant_id: &str) -> Option<Project> {
        match self.fetch_project(tenant_id).await {
            Ok(project) => Some(project),
            Err(e) if e.is_not_found() => {
                tracing::debug!(tenant = tenant_id, "No project for tenant: {}", e);
                None
            }
            Err(e) => {
                tracing::warn!(tenant = tenant_id, "Project fetch failed: {}", e);
                None
            }
        }
    }
}
