use std::sync::Arc;

use chrono::Utc;
use shared::{ApiError, ApiResult, ReferenceValidator};
use uuid::Uuid;

use crate::models::{
    CreateInventoryItemRequest, InventoryFilter, InventoryItem, UpdateInventoryItemRequest,
};
use crate::repository::{AdjustResult, InventoryRepository};

/// Inventory business logic. An item always points at an existing
/// warehouse and commodity; quantity changes go through the store's
/// atomic increment-with-floor.
pub struct InventoryService {
    repo: Arc<dyn InventoryRepository>,
    warehouses: ReferenceValidator,
    commodities: ReferenceValidator,
    customers: ReferenceValidator,
}

impl InventoryService {
    pub fn new(
        repo: Arc<dyn InventoryRepository>,
        warehouses: ReferenceValidator,
        commodities: ReferenceValidator,
        customers: ReferenceValidator,
    ) -> Self {
        Self {
            repo,
            warehouses,
            commodities,
            customers,
        }
    }

    pub async fn create(&self, request: CreateInventoryItemRequest) -> ApiResult<InventoryItem> {
        if request.quantity <= 0 {
            return Err(ApiError::Validation(
                "quantity must be greater than zero".into(),
            ));
        }
        self.warehouses
            .require("warehouse_id", &request.warehouse_id)
            .await?;
        self.commodities
            .require("commodity_id", &request.commodity_id)
            .await?;
        self.customers
            .check_optional("customer_id", request.customer_id.as_deref())
            .await?;

        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            warehouse_id: request.warehouse_id,
            commodity_id: request.commodity_id,
            customer_id: request.customer_id.filter(|c| !c.is_empty()),
            quantity: request.quantity,
            last_updated: Utc::now(),
        };
        self.repo.create(&item).await?;
        Ok(item)
    }

    pub async fn list(&self, filter: InventoryFilter) -> ApiResult<Vec<InventoryItem>> {
        Ok(self.repo.find_all(&filter).await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<InventoryItem> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("inventory item not found".into()))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateInventoryItemRequest,
    ) -> ApiResult<InventoryItem> {
        if let Some(quantity) = request.quantity {
            if quantity < 0 {
                return Err(ApiError::Validation("quantity must not be negative".into()));
            }
        }
        if let Some(warehouse_id) = &request.warehouse_id {
            self.warehouses.require("warehouse_id", warehouse_id).await?;
        }
        if let Some(commodity_id) = &request.commodity_id {
            self.commodities.require("commodity_id", commodity_id).await?;
        }
        self.customers
            .check_optional("customer_id", request.customer_id.as_deref())
            .await?;

        if !self.repo.update(id, &request).await? {
            return Err(ApiError::NotFound("inventory item not found".into()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::NotFound("inventory item not found".into()));
        }
        Ok(())
    }

    pub async fn adjust(&self, id: &str, delta: i64) -> ApiResult<InventoryItem> {
        match self.repo.adjust_quantity(id, delta).await? {
            AdjustResult::Adjusted(item) => Ok(item),
            AdjustResult::InsufficientStock => Err(ApiError::Conflict(
                "insufficient stock: adjustment would make quantity negative".into(),
            )),
            AdjustResult::NotFound => Err(ApiError::NotFound("inventory item not found".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryInventoryRepository;
    use async_trait::async_trait;
    use shared::{EntityRef, ReferenceClient, ReferenceError};

    struct StubPeer {
        resource: &'static str,
        known: Vec<&'static str>,
    }

    #[async_trait]
    impl ReferenceClient for StubPeer {
        fn resource(&self) -> &str {
            self.resource
        }

        async fn fetch(&self, id: &str) -> Result<EntityRef, ReferenceError> {
            if self.known.contains(&id) {
                Ok(EntityRef {
                    id: id.to_string(),
                    name: "stub".into(),
                })
            } else {
                Err(ReferenceError::NotFound {
                    resource: self.resource.to_string(),
                    id: id.to_string(),
                })
            }
        }
    }

    fn validator(resource: &'static str, known: Vec<&'static str>) -> ReferenceValidator {
        ReferenceValidator::new(Arc::new(StubPeer { resource, known }))
    }

    fn service(
        warehouses: Vec<&'static str>,
        commodities: Vec<&'static str>,
        customers: Vec<&'static str>,
    ) -> (InventoryService, Arc<MemoryInventoryRepository>) {
        let repo = Arc::new(MemoryInventoryRepository::default());
        (
            InventoryService::new(
                repo.clone(),
                validator("warehouses", warehouses),
                validator("commodities", commodities),
                validator("customers", customers),
            ),
            repo,
        )
    }

    fn create_request(quantity: i64) -> CreateInventoryItemRequest {
        CreateInventoryItemRequest {
            warehouse_id: "w-1".into(),
            commodity_id: "k-1".into(),
            customer_id: None,
            quantity,
        }
    }

    #[tokio::test]
    async fn successive_adjustments_sum_onto_the_initial_quantity() {
        let (service, _) = service(vec!["w-1"], vec!["k-1"], vec![]);
        let item = service.create(create_request(10)).await.unwrap();

        service.adjust(&item.id, 5).await.unwrap();
        service.adjust(&item.id, -3).await.unwrap();
        let adjusted = service.adjust(&item.id, 8).await.unwrap();
        assert_eq!(adjusted.quantity, 20);
    }

    #[tokio::test]
    async fn adjustment_below_zero_is_rejected_and_leaves_quantity_unchanged() {
        let (service, _) = service(vec!["w-1"], vec!["k-1"], vec![]);
        let item = service.create(create_request(5)).await.unwrap();

        let err = service.adjust(&item.id, -6).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(service.get(&item.id).await.unwrap().quantity, 5);

        // draining to exactly zero is allowed
        let drained = service.adjust(&item.id, -5).await.unwrap();
        assert_eq!(drained.quantity, 0);
    }

    #[tokio::test]
    async fn adjusting_an_unknown_item_is_not_found() {
        let (service, _) = service(vec![], vec![], vec![]);
        let err = service.adjust("missing", 1).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_with_unknown_warehouse_persists_nothing() {
        let (service, repo) = service(vec![], vec!["k-1"], vec![]);
        let err = service.create(create_request(10)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(repo
            .find_all(&InventoryFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn create_with_unknown_commodity_persists_nothing() {
        let (service, repo) = service(vec!["w-1"], vec![], vec![]);
        let err = service.create(create_request(10)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(repo
            .find_all(&InventoryFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn create_requires_a_positive_quantity() {
        let (service, _) = service(vec!["w-1"], vec!["k-1"], vec![]);
        let err = service.create(create_request(0)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn update_revalidates_changed_references() {
        let (service, _) = service(vec!["w-1"], vec!["k-1"], vec![]);
        let item = service.create(create_request(10)).await.unwrap();

        let err = service
            .update(
                &item.id,
                UpdateInventoryItemRequest {
                    warehouse_id: Some("w-2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(service.get(&item.id).await.unwrap().warehouse_id, "w-1");
    }

    #[tokio::test]
    async fn list_filters_are_exact_matches() {
        let (service, _) = service(vec!["w-1", "w-2"], vec!["k-1"], vec![]);
        service.create(create_request(1)).await.unwrap();
        service
            .create(CreateInventoryItemRequest {
                warehouse_id: "w-2".into(),
                commodity_id: "k-1".into(),
                customer_id: None,
                quantity: 2,
            })
            .await
            .unwrap();

        let matches = service
            .list(InventoryFilter {
                warehouse_id: Some("w-2".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].warehouse_id, "w-2");
    }
}
