use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::models::{UpdateWarehouseRequest, Warehouse, WarehouseFilter};

#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn create(&self, warehouse: &Warehouse) -> Result<()>;
    async fn find_all(&self, filter: &WarehouseFilter) -> Result<Vec<Warehouse>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Warehouse>>;
    /// Applies only the supplied fields; empty reference strings are
    /// ignored. Ok(false) when no document matched.
    async fn update(&self, id: &str, update: &UpdateWarehouseRequest) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
    /// Sets or clears the booking. Ok(false) when the warehouse does
    /// not exist.
    async fn set_booking(&self, id: &str, customer_id: Option<&str>) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize)]
struct WarehouseDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    location: String,
    storage: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    commodity_id: Option<String>,
}

impl From<&Warehouse> for WarehouseDocument {
    fn from(warehouse: &Warehouse) -> Self {
        Self {
            id: warehouse.id.clone(),
            name: warehouse.name.clone(),
            location: warehouse.location.clone(),
            storage: warehouse.storage,
            customer_id: warehouse.customer_id.clone(),
            commodity_id: warehouse.commodity_id.clone(),
        }
    }
}

impl From<WarehouseDocument> for Warehouse {
    fn from(doc: WarehouseDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            location: doc.location,
            storage: doc.storage,
            customer_id: doc.customer_id,
            commodity_id: doc.commodity_id,
        }
    }
}

pub struct MongoWarehouseRepository {
    collection: Collection<WarehouseDocument>,
}

impl MongoWarehouseRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("warehouses"),
        }
    }
}

#[async_trait]
impl WarehouseRepository for MongoWarehouseRepository {
    async fn create(&self, warehouse: &Warehouse) -> Result<()> {
        self.collection
            .insert_one(WarehouseDocument::from(warehouse))
            .await?;
        Ok(())
    }

    async fn find_all(&self, filter: &WarehouseFilter) -> Result<Vec<Warehouse>> {
        let mut query = doc! {};
        if let Some(customer_id) = &filter.customer_id {
            query.insert("customer_id", customer_id.as_str());
        }
        if let Some(commodity_id) = &filter.commodity_id {
            query.insert("commodity_id", commodity_id.as_str());
        }
        let docs: Vec<WarehouseDocument> = self.collection.find(query).await?.try_collect().await?;
        Ok(docs.into_iter().map(Warehouse::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Warehouse>> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Warehouse::from))
    }

    async fn update(&self, id: &str, update: &UpdateWarehouseRequest) -> Result<bool> {
        let mut set = doc! {};
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(location) = &update.location {
            set.insert("location", location.as_str());
        }
        if let Some(storage) = update.storage {
            set.insert("storage", storage);
        }
        if let Some(customer_id) = &update.customer_id {
            if !customer_id.is_empty() {
                set.insert("customer_id", customer_id.as_str());
            }
        }
        if let Some(commodity_id) = &update.commodity_id {
            if !commodity_id.is_empty() {
                set.insert("commodity_id", commodity_id.as_str());
            }
        }
        if set.is_empty() {
            return Ok(self.find_by_id(id).await?.is_some());
        }

        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn set_booking(&self, id: &str, customer_id: Option<&str>) -> Result<bool> {
        let update = match customer_id {
            Some(customer_id) => doc! { "$set": { "customer_id": customer_id } },
            None => doc! { "$unset": { "customer_id": "" } },
        };
        let result = self
            .collection
            .update_one(doc! { "_id": id }, update)
            .await?;
        Ok(result.matched_count > 0)
    }
}
