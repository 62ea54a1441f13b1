use std::sync::Arc;

use shared::{ApiError, ApiResult, ReferenceValidator};
use uuid::Uuid;

use crate::models::{CreateCustomerRequest, Customer, CustomerFilter, UpdateCustomerRequest};
use crate::repository::CustomerRepository;

/// Customer business logic. Every warehouse id supplied through any
/// mutating call is validated against the warehouse service before a
/// single byte is written.
pub struct CustomerService {
    repo: Arc<dyn CustomerRepository>,
    warehouses: ReferenceValidator,
}

impl CustomerService {
    pub fn new(repo: Arc<dyn CustomerRepository>, warehouses: ReferenceValidator) -> Self {
        Self { repo, warehouses }
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> ApiResult<Customer> {
        if request.name.is_empty() {
            return Err(ApiError::Validation("customer name is required".into()));
        }
        self.warehouses
            .check_each("warehouse_id", &request.warehouse_ids)
            .await?;

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            warehouse_ids: request.warehouse_ids,
        };
        self.repo.create(&customer).await?;
        Ok(customer)
    }

    pub async fn list(&self, filter: CustomerFilter) -> ApiResult<Vec<Customer>> {
        Ok(self.repo.find_all(&filter).await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Customer> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("customer not found".into()))
    }

    pub async fn update(&self, id: &str, request: UpdateCustomerRequest) -> ApiResult<Customer> {
        if let Some(name) = &request.name {
            if name.is_empty() {
                return Err(ApiError::Validation("customer name must not be empty".into()));
            }
        }
        if let Some(warehouse_ids) = &request.warehouse_ids {
            self.warehouses
                .check_each("warehouse_id", warehouse_ids)
                .await?;
        }

        if !self.repo.update(id, &request).await? {
            return Err(ApiError::NotFound("customer not found".into()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::NotFound("customer not found".into()));
        }
        Ok(())
    }

    pub async fn add_warehouse(&self, customer_id: &str, warehouse_id: &str) -> ApiResult<()> {
        self.warehouses
            .require("warehouse_id", warehouse_id)
            .await?;
        if !self.repo.add_warehouse(customer_id, warehouse_id).await? {
            return Err(ApiError::NotFound("customer not found".into()));
        }
        Ok(())
    }

    pub async fn remove_warehouse(&self, customer_id: &str, warehouse_id: &str) -> ApiResult<()> {
        if !self.repo.remove_warehouse(customer_id, warehouse_id).await? {
            return Err(ApiError::NotFound("customer not found".into()));
        }
        Ok(())
    }
}
