use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::models::{Commodity, UpdateCommodityRequest};

/// Document-store access for commodities. Ids are service-generated;
/// the store never invents one.
#[async_trait]
pub trait CommodityRepository: Send + Sync {
    async fn create(&self, commodity: &Commodity) -> Result<()>;
    async fn find_all(&self) -> Result<Vec<Commodity>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Commodity>>;
    /// Applies only the supplied fields. Ok(false) when no document matched.
    async fn update(&self, id: &str, update: &UpdateCommodityRequest) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Stored shape; the service-generated UUID lives in `_id`.
#[derive(Debug, Serialize, Deserialize)]
struct CommodityDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    amount: i64,
}

impl From<&Commodity> for CommodityDocument {
    fn from(commodity: &Commodity) -> Self {
        Self {
            id: commodity.id.clone(),
            name: commodity.name.clone(),
            amount: commodity.amount,
        }
    }
}

impl From<CommodityDocument> for Commodity {
    fn from(doc: CommodityDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            amount: doc.amount,
        }
    }
}

pub struct MongoCommodityRepository {
    collection: Collection<CommodityDocument>,
}

impl MongoCommodityRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("commodities"),
        }
    }
}

#[async_trait]
impl CommodityRepository for MongoCommodityRepository {
    async fn create(&self, commodity: &Commodity) -> Result<()> {
        self.collection
            .insert_one(CommodityDocument::from(commodity))
            .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Commodity>> {
        let docs: Vec<CommodityDocument> =
            self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(docs.into_iter().map(Commodity::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Commodity>> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Commodity::from))
    }

    async fn update(&self, id: &str, update: &UpdateCommodityRequest) -> Result<bool> {
        let mut set = doc! {};
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(amount) = update.amount {
            set.insert("amount", amount);
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
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory stand-in used by service tests.
    #[derive(Default)]
    pub struct MemoryCommodityRepository {
        items: Mutex<HashMap<String, Commodity>>,
    }

    #[async_trait]
    impl CommodityRepository for MemoryCommodityRepository {
        async fn create(&self, commodity: &Commodity) -> Result<()> {
            self.items
                .lock()
                .unwrap()
                .insert(commodity.id.clone(), commodity.clone());
            Ok(())
        }

        async fn find_all(&self) -> Result<Vec<Commodity>> {
            Ok(self.items.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Commodity>> {
            Ok(self.items.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, id: &str, update: &UpdateCommodityRequest) -> Result<bool> {
            let mut items = self.items.lock().unwrap();
            match items.get_mut(id) {
                Some(commodity) => {
                    if let Some(name) = &update.name {
                        commodity.name = name.clone();
                    }
                    if let Some(amount) = update.amount {
                        commodity.amount = amount;
                    }
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            Ok(self.items.lock().unwrap().remove(id).is_some())
        }
    }
}
