use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use shared::ApiError;

use crate::models::{CreateWarehouseRequest, UpdateWarehouseRequest, Warehouse, WarehouseFilter};
use crate::service::WarehouseService;

#[derive(Clone)]
pub struct AppState {
    pub warehouses: Arc<WarehouseService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/warehouses",
            axum::routing::post(create_warehouse).get(list_warehouses),
        )
        .route(
            "/warehouses/:id",
            get(get_warehouse)
                .put(update_warehouse)
                .delete(delete_warehouse),
        )
        .route(
            "/warehouses/:id/book/:customer_id",
            axum::routing::post(book_warehouse),
        )
        .route(
            "/warehouses/:id/unbook/:customer_id",
            axum::routing::delete(unbook_warehouse),
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

async fn create_warehouse(
    State(state): State<AppState>,
    Json(request): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<Warehouse>), ApiError> {
    let warehouse = state.warehouses.create(request).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

async fn list_warehouses(
    State(state): State<AppState>,
    Query(filter): Query<WarehouseFilter>,
) -> Result<Json<Vec<Warehouse>>, ApiError> {
    Ok(Json(state.warehouses.list(filter).await?))
}

async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Warehouse>, ApiError> {
    Ok(Json(state.warehouses.get(&id).await?))
}

async fn update_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateWarehouseRequest>,
) -> Result<Json<Warehouse>, ApiError> {
    Ok(Json(state.warehouses.update(&id, request).await?))
}

async fn delete_warehouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.warehouses.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn book_warehouse(
    State(state): State<AppState>,
    Path((id, customer_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.warehouses.book(&id, &customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn unbook_warehouse(
    State(state): State<AppState>,
    Path((id, customer_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.warehouses.unbook(&id, &customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_check() -> &'static str {
    "OK"
}
