use std::sync::Arc;

use shared::{ApiError, ApiResult};
use uuid::Uuid;

use crate::models::{Commodity, CreateCommodityRequest, UpdateCommodityRequest};
use crate::repository::CommodityRepository;

/// Commodity business logic. Commodities carry no foreign keys, so no
/// peer validation is involved.
pub struct CommodityService {
    repo: Arc<dyn CommodityRepository>,
}

impl CommodityService {
    pub fn new(repo: Arc<dyn CommodityRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreateCommodityRequest) -> ApiResult<Commodity> {
        if request.name.is_empty() {
            return Err(ApiError::Validation("commodity name is required".into()));
        }
        if request.amount < 0 {
            return Err(ApiError::Validation("amount must not be negative".into()));
        }

        let commodity = Commodity {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            amount: request.amount,
        };
        self.repo.create(&commodity).await?;
        Ok(commodity)
    }

    pub async fn list(&self) -> ApiResult<Vec<Commodity>> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Commodity> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("commodity not found".into()))
    }

    pub async fn update(&self, id: &str, request: UpdateCommodityRequest) -> ApiResult<Commodity> {
        if let Some(name) = &request.name {
            if name.is_empty() {
                return Err(ApiError::Validation("commodity name must not be empty".into()));
            }
        }
        if let Some(amount) = request.amount {
            if amount < 0 {
                return Err(ApiError::Validation("amount must not be negative".into()));
            }
        }

        if !self.repo.update(id, &request).await? {
            return Err(ApiError::NotFound("commodity not found".into()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::NotFound("commodity not found".into()));
        }
        Ok(())
    }
}
