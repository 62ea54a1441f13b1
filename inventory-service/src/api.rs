use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use shared::ApiError;

use crate::models::{
    AdjustQuantityRequest, CreateInventoryItemRequest, InventoryFilter, InventoryItem,
    UpdateInventoryItemRequest,
};
use crate::service::InventoryService;

#[derive(Clone)]
pub struct AppState {
    pub inventory: Arc<InventoryService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/inventory",
            axum::routing::post(create_item).get(list_items),
        )
        .route(
            "/inventory/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/inventory/:id/adjust", axum::routing::post(adjust_item))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let item = state.inventory.create(request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<InventoryFilter>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(state.inventory.list(filter).await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InventoryItem>, ApiError> {
    Ok(Json(state.inventory.get(&id).await?))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<Json<InventoryItem>, ApiError> {
    Ok(Json(state.inventory.update(&id, request).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.inventory.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn adjust_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AdjustQuantityRequest>,
) -> Result<Json<InventoryItem>, ApiError> {
    let item = state
        .inventory
        .adjust(&id, request.quantity_change)
        .await?;
    Ok(Json(item))
}

async fn health_check() -> &'static str {
    "OK"
}
