use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use shared::ApiError;

use crate::models::{Commodity, CreateCommodityRequest, UpdateCommodityRequest};
use crate::service::CommodityService;

#[derive(Clone)]
pub struct AppState {
    pub commodities: Arc<CommodityService>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/commodities",
            axum::routing::post(create_commodity).get(list_commodities),
        )
        .route(
            "/commodities/:id",
            get(get_commodity)
                .put(update_commodity)
                .delete(delete_commodity),
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

async fn create_commodity(
    State(state): State<AppState>,
    Json(request): Json<CreateCommodityRequest>,
) -> Result<(StatusCode, Json<Commodity>), ApiError> {
    let commodity = state.commodities.create(request).await?;
    Ok((StatusCode::CREATED, Json(commodity)))
}

async fn list_commodities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Commodity>>, ApiError> {
    Ok(Json(state.commodities.list().await?))
}

async fn get_commodity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Commodity>, ApiError> {
    Ok(Json(state.commodities.get(&id).await?))
}

async fn update_commodity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommodityRequest>,
) -> Result<Json<Commodity>, ApiError> {
    Ok(Json(state.commodities.update(&id, request).await?))
}

async fn delete_commodity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.commodities.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_check() -> &'static str {
    "OK"
}
