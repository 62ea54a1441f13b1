use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use shared::ApiError;

use crate::models::{CreateCustomerRequest, Customer, CustomerFilter, UpdateCustomerRequest};
use crate::service::CustomerService;

#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/customers",
            axum::routing::post(create_customer).get(list_customers),
        )
        .route(
            "/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route(
            "/customers/:id/warehouses/:warehouse_id",
            axum::routing::post(add_warehouse).delete(remove_warehouse),
        )
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state.customers.create(request).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn list_customers(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.customers.list(filter).await?))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.customers.get(&id).await?))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.customers.update(&id, request).await?))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.customers.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_warehouse(
    State(state): State<AppState>,
    Path((id, warehouse_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.customers.add_warehouse(&id, &warehouse_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_warehouse(
    State(state): State<AppState>,
    Path((id, warehouse_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.customers.remove_warehouse(&id, &warehouse_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_check() -> &'static str {
    "OK"
}
