use serde::{Deserialize, Serialize};

/// A warehouse. `customer_id` is the booking: empty means unbooked,
/// otherwise the warehouse is booked by exactly that customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub name: String,
    pub location: String,
    pub storage: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity_id: Option<String>,
}

impl Warehouse {
    /// Current booking state; an empty stored id counts as unbooked.
    pub fn booked_by(&self) -> Option<&str> {
        self.customer_id.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWarehouseRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub storage: i64,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub commodity_id: Option<String>,
}

/// Partial update: only supplied fields change. A supplied
/// `customer_id` obeys the same conflict rule as booking.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWarehouseRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub storage: Option<i64>,
    pub customer_id: Option<String>,
    pub commodity_id: Option<String>,
}

/// Optional exact-match list filters.
#[derive(Debug, Default, Deserialize)]
pub struct WarehouseFilter {
    pub customer_id: Option<String>,
    pub commodity_id: Option<String>,
}
