use serde::{Deserialize, Serialize};

/// A customer and the warehouses associated with it. The warehouse ids
/// are weak references owned by the warehouse service; the list keeps
/// insertion order and this service keeps it duplicate-free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub warehouse_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub warehouse_ids: Vec<String>,
}

/// Partial update: only supplied fields change. A supplied
/// `warehouse_ids` replaces the whole list.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub warehouse_ids: Option<Vec<String>>,
}

/// Optional exact-match list filter.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerFilter {
    pub warehouse_id: Option<String>,
}
