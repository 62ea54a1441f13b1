use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Timeout for a single-entity existence check against a peer service.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal cross-service contract. Peers expose richer documents; a
/// validating service only ever needs to know the entity resolves.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    #[error("{resource} service unavailable: {reason}")]
    Unavailable { resource: String, reason: String },
}

/// Read-only existence check against the service owning a resource.
/// Injected so service logic can be tested without a network.
#[async_trait]
pub trait ReferenceClient: Send + Sync {
    /// Resource path segment on the owning service, e.g. "warehouses".
    fn resource(&self) -> &str;

    /// Fetch the entity with the given id. Never mutates remote state.
    async fn fetch(&self, id: &str) -> Result<EntityRef, ReferenceError>;
}

/// HTTP implementation: GET `<base>/<resource>/<id>` with a bounded
/// timeout. Only a 404 means the entity does not exist; every other
/// failure is classified as the peer being unavailable.
pub struct HttpReferenceClient {
    base_url: String,
    resource: String,
    client: reqwest::Client,
}

impl HttpReferenceClient {
    pub fn new(base_url: impl Into<String>, resource: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            resource: resource.into(),
            client,
        })
    }
}

#[async_trait]
impl ReferenceClient for HttpReferenceClient {
    fn resource(&self) -> &str {
        &self.resource
    }

    async fn fetch(&self, id: &str) -> Result<EntityRef, ReferenceError> {
        let url = format!("{}/{}/{}", self.base_url, self.resource, id);
        tracing::debug!("checking reference at {}", url);

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| ReferenceError::Unavailable {
                    resource: self.resource.clone(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ReferenceError::NotFound {
                resource: self.resource.clone(),
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ReferenceError::Unavailable {
                resource: self.resource.clone(),
                reason: format!("responded with status {}", status),
            });
        }

        response
            .json::<EntityRef>()
            .await
            .map_err(|e| ReferenceError::Unavailable {
                resource: self.resource.clone(),
                reason: format!("invalid response body: {}", e),
            })
    }
}
