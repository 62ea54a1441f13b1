use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::models::{InventoryFilter, InventoryItem, UpdateInventoryItemRequest};

/// Outcome of an atomic quantity adjustment.
#[derive(Debug)]
pub enum AdjustResult {
    Adjusted(InventoryItem),
    /// The delta would have taken the quantity below zero; nothing was
    /// written.
    InsufficientStock,
    NotFound,
}

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn create(&self, item: &InventoryItem) -> Result<()>;
    async fn find_all(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<InventoryItem>>;
    /// Applies only the supplied fields and refreshes `last_updated`.
    /// Ok(false) when no document matched.
    async fn update(&self, id: &str, update: &UpdateInventoryItemRequest) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
    /// Applies the delta in a single store-side operation with a floor
    /// at zero. Concurrent adjustments must not lose updates.
    async fn adjust_quantity(&self, id: &str, delta: i64) -> Result<AdjustResult>;
}

#[derive(Debug, Serialize, Deserialize)]
struct InventoryItemDocument {
    #[serde(rename = "_id")]
    id: String,
    warehouse_id: String,
    commodity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    quantity: i64,
    last_updated: bson::DateTime,
}

impl From<&InventoryItem> for InventoryItemDocument {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id.clone(),
            warehouse_id: item.warehouse_id.clone(),
            commodity_id: item.commodity_id.clone(),
            customer_id: item.customer_id.clone(),
            quantity: item.quantity,
            last_updated: bson::DateTime::from_chrono(item.last_updated),
        }
    }
}

impl From<InventoryItemDocument> for InventoryItem {
    fn from(doc: InventoryItemDocument) -> Self {
        Self {
            id: doc.id,
            warehouse_id: doc.warehouse_id,
            commodity_id: doc.commodity_id,
            customer_id: doc.customer_id,
            quantity: doc.quantity,
            last_updated: doc.last_updated.to_chrono(),
        }
    }
}

pub struct MongoInventoryRepository {
    collection: Collection<InventoryItemDocument>,
}

impl MongoInventoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("inventories"),
        }
    }
}

#[async_trait]
impl InventoryRepository for MongoInventoryRepository {
    async fn create(&self, item: &InventoryItem) -> Result<()> {
        self.collection
            .insert_one(InventoryItemDocument::from(item))
            .await?;
        Ok(())
    }

    async fn find_all(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>> {
        let mut query = doc! {};
        if let Some(warehouse_id) = &filter.warehouse_id {
            query.insert("warehouse_id", warehouse_id.as_str());
        }
        if let Some(commodity_id) = &filter.commodity_id {
            query.insert("commodity_id", commodity_id.as_str());
        }
        if let Some(customer_id) = &filter.customer_id {
            query.insert("customer_id", customer_id.as_str());
        }
        let docs: Vec<InventoryItemDocument> =
            self.collection.find(query).await?.try_collect().await?;
        Ok(docs.into_iter().map(InventoryItem::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InventoryItem>> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(InventoryItem::from))
    }

    async fn update(&self, id: &str, update: &UpdateInventoryItemRequest) -> Result<bool> {
        let mut set = doc! {};
        if let Some(warehouse_id) = &update.warehouse_id {
            set.insert("warehouse_id", warehouse_id.as_str());
        }
        if let Some(commodity_id) = &update.commodity_id {
            set.insert("commodity_id", commodity_id.as_str());
        }
        if let Some(customer_id) = &update.customer_id {
            if !customer_id.is_empty() {
                set.insert("customer_id", customer_id.as_str());
            }
        }
        if let Some(quantity) = update.quantity {
            set.insert("quantity", quantity);
        }
        if set.is_empty() {
            return Ok(self.find_by_id(id).await?.is_some());
        }
        set.insert("last_updated", bson::DateTime::from_chrono(Utc::now()));

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

    async fn adjust_quantity(&self, id: &str, delta: i64) -> Result<AdjustResult> {
        // One conditional findAndModify: the quantity guard makes the
        // increment-with-floor atomic on the store side.
        let mut filter = doc! { "_id": id };
        if delta < 0 {
            filter.insert("quantity", doc! { "$gte": -delta });
        }
        let update = doc! {
            "$inc": { "quantity": delta },
            "$set": { "last_updated": bson::DateTime::from_chrono(Utc::now()) },
        };

        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        match updated {
            Some(doc) => Ok(AdjustResult::Adjusted(doc.into())),
            None => {
                if self.find_by_id(id).await?.is_some() {
                    Ok(AdjustResult::InsufficientStock)
                } else {
                    Ok(AdjustResult::NotFound)
                }
            }
        }
    }
}
