use std::sync::Arc;

use crate::error::ApiError;
use crate::reference::{ReferenceClient, ReferenceError};

/// Decides which foreign keys supplied in a payload must be checked and
/// runs the checks through the owning service's client. Results are
/// never cached; every mutating call that touches a reference re-runs
/// validation.
#[derive(Clone)]
pub struct ReferenceValidator {
    client: Arc<dyn ReferenceClient>,
}

impl ReferenceValidator {
    pub fn new(client: Arc<dyn ReferenceClient>) -> Self {
        Self { client }
    }

    /// Validate a reference that must be present and resolvable.
    pub async fn require(&self, field: &str, id: &str) -> Result<(), ApiError> {
        if id.is_empty() {
            return Err(ApiError::Validation(format!("{} must not be empty", field)));
        }
        self.check(field, id).await
    }

    /// Validate a single present reference. An absent peer entity is the
    /// caller's mistake (400); an unreachable peer aborts the whole
    /// operation as a server-side failure.
    pub async fn check(&self, field: &str, id: &str) -> Result<(), ApiError> {
        match self.client.fetch(id).await {
            Ok(_) => Ok(()),
            Err(err @ ReferenceError::NotFound { .. }) => Err(ApiError::Validation(format!(
                "invalid {} '{}': {}",
                field, id, err
            ))),
            Err(err @ ReferenceError::Unavailable { .. }) => {
                Err(ApiError::Upstream(err.to_string()))
            }
        }
    }

    /// Empty or absent optional references skip validation entirely.
    pub async fn check_optional(&self, field: &str, id: Option<&str>) -> Result<(), ApiError> {
        match id {
            Some(id) if !id.is_empty() => self.check(field, id).await,
            _ => Ok(()),
        }
    }

    /// Validate each element of a reference list independently,
    /// aborting on the first invalid one.
    pub async fn check_each(&self, field: &str, ids: &[String]) -> Result<(), ApiError> {
        for id in ids {
            self.require(field, id).await?;
        }
        Ok(())
    }
}
