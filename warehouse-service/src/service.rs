use std::sync::Arc;

use shared::{ApiError, ApiResult, ReferenceValidator};
use uuid::Uuid;

use crate::models::{CreateWarehouseRequest, UpdateWarehouseRequest, Warehouse, WarehouseFilter};
use crate::repository::WarehouseRepository;

/// Warehouse business logic, including the booking state machine:
/// a warehouse is either unbooked or booked by exactly one customer,
/// and a booking is never silently overwritten.
pub struct WarehouseService {
    repo: Arc<dyn WarehouseRepository>,
    customers: ReferenceValidator,
    commodities: ReferenceValidator,
}

impl WarehouseService {
    pub fn new(
        repo: Arc<dyn WarehouseRepository>,
        customers: ReferenceValidator,
        commodities: ReferenceValidator,
    ) -> Self {
        Self {
            repo,
            customers,
            commodities,
        }
    }

    pub async fn create(&self, request: CreateWarehouseRequest) -> ApiResult<Warehouse> {
        if request.name.is_empty() {
            return Err(ApiError::Validation("warehouse name is required".into()));
        }
        if request.storage < 0 {
            return Err(ApiError::Validation("storage must not be negative".into()));
        }
        self.customers
            .check_optional("customer_id", request.customer_id.as_deref())
            .await?;
        self.commodities
            .check_optional("commodity_id", request.commodity_id.as_deref())
            .await?;

        let warehouse = Warehouse {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            location: request.location,
            storage: request.storage,
            customer_id: request.customer_id.filter(|c| !c.is_empty()),
            commodity_id: request.commodity_id.filter(|c| !c.is_empty()),
        };
        self.repo.create(&warehouse).await?;
        Ok(warehouse)
    }

    pub async fn list(&self, filter: WarehouseFilter) -> ApiResult<Vec<Warehouse>> {
        Ok(self.repo.find_all(&filter).await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Warehouse> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("warehouse not found".into()))
    }

    pub async fn update(&self, id: &str, request: UpdateWarehouseRequest) -> ApiResult<Warehouse> {
        if let Some(name) = &request.name {
            if name.is_empty() {
                return Err(ApiError::Validation(
                    "warehouse name must not be empty".into(),
                ));
            }
        }
        if let Some(storage) = request.storage {
            if storage < 0 {
                return Err(ApiError::Validation("storage must not be negative".into()));
            }
        }
        self.commodities
            .check_optional("commodity_id", request.commodity_id.as_deref())
            .await?;

        // A customer_id arriving through update is a booking attempt and
        // obeys the same conflict rule as book().
        if let Some(customer_id) = request.customer_id.as_deref().filter(|c| !c.is_empty()) {
            self.customers.require("customer_id", customer_id).await?;
            let current = self.get(id).await?;
            match current.booked_by() {
                Some(existing) if existing != customer_id => {
                    return Err(ApiError::Conflict(
                        "warehouse is already booked by another customer".into(),
                    ));
                }
                _ => {}
            }
        }

        if !self.repo.update(id, &request).await? {
            return Err(ApiError::NotFound("warehouse not found".into()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::NotFound("warehouse not found".into()));
        }
        Ok(())
    }

    /// Book the warehouse for a customer. Booking an already-booked
    /// warehouse is idempotent for the same customer and a conflict for
    /// any other.
    pub async fn book(&self, id: &str, customer_id: &str) -> ApiResult<()> {
        self.customers.require("customer_id", customer_id).await?;
        let warehouse = self.get(id).await?;
        match warehouse.booked_by() {
            None => {
                self.repo.set_booking(id, Some(customer_id)).await?;
                Ok(())
            }
            Some(existing) if existing == customer_id => Ok(()),
            Some(_) => Err(ApiError::Conflict(
                "warehouse is already booked by another customer".into(),
            )),
        }
    }

    /// Release a booking held by this customer. Releasing someone
    /// else's booking, or a booking that does not exist, is a conflict.
    pub async fn unbook(&self, id: &str, customer_id: &str) -> ApiResult<()> {
        let warehouse = self.get(id).await?;
        match warehouse.booked_by() {
            Some(existing) if existing == customer_id => {
                self.repo.set_booking(id, None).await?;
                Ok(())
            }
            _ => Err(ApiError::Conflict(
                "warehouse is not booked by this customer".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryWarehouseRepository;
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

    fn service(
        known_customers: Vec<&'static str>,
        known_commodities: Vec<&'static str>,
    ) -> WarehouseService {
        WarehouseService::new(
            Arc::new(MemoryWarehouseRepository::default()),
            ReferenceValidator::new(Arc::new(StubPeer {
                resource: "customers",
                known: known_customers,
            })),
            ReferenceValidator::new(Arc::new(StubPeer {
                resource: "commodities",
                known: known_commodities,
            })),
        )
    }

    async fn seed(service: &WarehouseService) -> Warehouse {
        service
            .create(CreateWarehouseRequest {
                name: "north depot".into(),
                location: "oslo".into(),
                storage: 500,
                customer_id: None,
                commodity_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn booking_an_unbooked_warehouse_succeeds() {
        let service = service(vec!["c-1"], vec![]);
        let warehouse = seed(&service).await;

        service.book(&warehouse.id, "c-1").await.unwrap();
        let booked = service.get(&warehouse.id).await.unwrap();
        assert_eq!(booked.booked_by(), Some("c-1"));
    }

    #[tokio::test]
    async fn rebooking_by_the_same_customer_is_idempotent() {
        let service = service(vec!["c-1"], vec![]);
        let warehouse = seed(&service).await;

        service.book(&warehouse.id, "c-1").await.unwrap();
        let first = service.get(&warehouse.id).await.unwrap();
        service.book(&warehouse.id, "c-1").await.unwrap();
        let second = service.get(&warehouse.id).await.unwrap();
        assert_eq!(first.booked_by(), second.booked_by());
    }

    #[tokio::test]
    async fn booking_a_warehouse_held_by_another_customer_conflicts() {
        let service = service(vec!["c-1", "c-2"], vec![]);
        let warehouse = seed(&service).await;

        service.book(&warehouse.id, "c-1").await.unwrap();
        let err = service.book(&warehouse.id, "c-2").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        // state unchanged
        let current = service.get(&warehouse.id).await.unwrap();
        assert_eq!(current.booked_by(), Some("c-1"));
    }

    #[tokio::test]
    async fn booking_with_an_unknown_customer_is_rejected() {
        let service = service(vec![], vec![]);
        let warehouse = seed(&service).await;
        let err = service.book(&warehouse.id, "c-9").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn unbook_clears_the_holding_customers_booking() {
        let service = service(vec!["c-1"], vec![]);
        let warehouse = seed(&service).await;

        service.book(&warehouse.id, "c-1").await.unwrap();
        service.unbook(&warehouse.id, "c-1").await.unwrap();
        let current = service.get(&warehouse.id).await.unwrap();
        assert_eq!(current.booked_by(), None);
    }

    #[tokio::test]
    async fn unbook_by_a_non_holder_conflicts() {
        let service = service(vec!["c-1", "c-2"], vec![]);
        let warehouse = seed(&service).await;

        // unbooked warehouse
        let err = service.unbook(&warehouse.id, "c-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // booked by someone else
        service.book(&warehouse.id, "c-1").await.unwrap();
        let err = service.unbook(&warehouse.id, "c-2").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let current = service.get(&warehouse.id).await.unwrap();
        assert_eq!(current.booked_by(), Some("c-1"));
    }

    #[tokio::test]
    async fn update_with_customer_id_obeys_the_booking_conflict_rule() {
        let service = service(vec!["c-1", "c-2"], vec![]);
        let warehouse = seed(&service).await;
        service.book(&warehouse.id, "c-1").await.unwrap();

        let err = service
            .update(
                &warehouse.id,
                UpdateWarehouseRequest {
                    customer_id: Some("c-2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // same customer through update is the idempotent case
        let updated = service
            .update(
                &warehouse.id,
                UpdateWarehouseRequest {
                    customer_id: Some("c-1".into()),
                    storage: Some(750),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.booked_by(), Some("c-1"));
        assert_eq!(updated.storage, 750);
    }

    #[tokio::test]
    async fn create_with_unknown_commodity_is_rejected() {
        let service = service(vec![], vec![]);
        let err = service
            .create(CreateWarehouseRequest {
                name: "north depot".into(),
                location: "oslo".into(),
                storage: 500,
                customer_id: None,
                commodity_id: Some("k-9".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn list_filters_by_booking_customer() {
        let service = service(vec!["c-1"], vec![]);
        let first = seed(&service).await;
        seed(&service).await;
        service.book(&first.id, "c-1").await.unwrap();

        let matches = service
            .list(WarehouseFilter {
                customer_id: Some("c-1".into()),
                commodity_id: None,
            })
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, first.id);
    }
}
