use serde::{Deserialize, Serialize};

/// A product type stored in warehouses. `amount` is the total tracked
/// amount of the commodity and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commodity {
    pub id: String,
    pub name: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommodityRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: i64,
}

/// Partial update: only supplied fields change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommodityRequest {
    pub name: Option<String>,
    pub amount: Option<i64>,
}
