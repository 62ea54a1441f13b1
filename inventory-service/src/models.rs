use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stock record: some quantity of a commodity held in a warehouse,
/// optionally on behalf of a customer. Quantity never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub warehouse_id: String,
    pub commodity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub quantity: i64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInventoryItemRequest {
    #[serde(default)]
    pub warehouse_id: String,
    #[serde(default)]
    pub commodity_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub quantity: i64,
}

/// Partial update: only supplied fields change. Supplied references are
/// re-validated; warehouse and commodity must stay non-empty.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateInventoryItemRequest {
    pub warehouse_id: Option<String>,
    pub commodity_id: Option<String>,
    pub customer_id: Option<String>,
    pub quantity: Option<i64>,
}

/// Body of `POST /inventory/:id/adjust`. The delta is applied to the
/// stored quantity, not written as an absolute value.
#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    #[serde(rename = "quantityChange")]
    pub quantity_change: i64,
}

/// Optional exact-match list filters.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryFilter {
    pub warehouse_id: Option<String>,
    pub commodity_id: Option<String>,
    pub customer_id: Option<String>,
}
