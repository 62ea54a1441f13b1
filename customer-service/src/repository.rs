use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::models::{Customer, CustomerFilter, UpdateCustomerRequest};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> Result<()>;
    async fn find_all(&self, filter: &CustomerFilter) -> Result<Vec<Customer>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>>;
    /// Applies only the supplied fields. Ok(false) when no document matched.
    async fn update(&self, id: &str, update: &UpdateCustomerRequest) -> Result<bool>;
    async fn delete(&self, id: &str) -> Result<bool>;
    /// Adds the warehouse to the customer's list only if it is not
    /// already present. Ok(false) when the customer does not exist.
    async fn add_warehouse(&self, customer_id: &str, warehouse_id: &str) -> Result<bool>;
    /// Removes every occurrence of the warehouse from the list.
    /// Ok(false) when the customer does not exist.
    async fn remove_warehouse(&self, customer_id: &str, warehouse_id: &str) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CustomerDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    warehouse_ids: Vec<String>,
}

impl From<&Customer> for CustomerDocument {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            warehouse_ids: customer.warehouse_ids.clone(),
        }
    }
}

impl From<CustomerDocument> for Customer {
    fn from(doc: CustomerDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            warehouse_ids: doc.warehouse_ids,
        }
    }
}

pub struct MongoCustomerRepository {
    collection: Collection<CustomerDocument>,
}

impl MongoCustomerRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("customers"),
        }
    }
}

#[async_trait]
impl CustomerRepository for MongoCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<()> {
        self.collection
            .insert_one(CustomerDocument::from(customer))
            .await?;
        Ok(())
    }

    async fn find_all(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        let query = match &filter.warehouse_id {
            Some(warehouse_id) => doc! { "warehouse_ids": warehouse_id.as_str() },
            None => doc! {},
        };
        let docs: Vec<CustomerDocument> = self.collection.find(query).await?.try_collect().await?;
        Ok(docs.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(Customer::from))
    }

    async fn update(&self, id: &str, update: &UpdateCustomerRequest) -> Result<bool> {
        let mut set = doc! {};
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(warehouse_ids) = &update.warehouse_ids {
            set.insert("warehouse_ids", warehouse_ids.clone());
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

    async fn add_warehouse(&self, customer_id: &str, warehouse_id: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": customer_id },
                doc! { "$addToSet": { "warehouse_ids": warehouse_id } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn remove_warehouse(&self, customer_id: &str, warehouse_id: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": customer_id },
                doc! { "$pull": { "warehouse_ids": warehouse_id } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryCustomerRepository {
        items: Mutex<HashMap<String, Customer>>,
    }

    #[async_trait]
    impl CustomerRepository for MemoryCustomerRepository {
        async fn create(&self, customer: &Customer) -> Result<()> {
            self.items
                .lock()
                .unwrap()
                .insert(customer.id.clone(), customer.clone());
            Ok(())
        }

        async fn find_all(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
            let items = self.items.lock().unwrap();
            Ok(items
                .values()
                .filter(|c| match &filter.warehouse_id {
                    Some(w) => c.warehouse_ids.contains(w),
                    None => true,
                })
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Customer>> {
            Ok(self.items.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, id: &str, update: &UpdateCustomerRequest) -> Result<bool> {
            let mut items = self.items.lock().unwrap();
            match items.get_mut(id) {
                Some(customer) => {
                    if let Some(name) = &update.name {
                        customer.name = name.clone();
                    }
                    if let Some(warehouse_ids) = &update.warehouse_ids {
                        customer.warehouse_ids = warehouse_ids.clone();
                    }
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: &str) -> Result<bool> {
            Ok(self.items.lock().unwrap().remove(id).is_some())
        }

        async fn add_warehouse(&self, customer_id: &str, warehouse_id: &str) -> Result<bool> {
            let mut items = self.items.lock().unwrap();
            match items.get_mut(customer_id) {
                Some(customer) => {
                    if !customer.warehouse_ids.iter().any(|w| w == warehouse_id) {
                        customer.warehouse_ids.push(warehouse_id.to_string());
                    }
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn remove_warehouse(&self, customer_id: &str, warehouse_id: &str) -> Result<bool> {
            let mut items = self.items.lock().unwrap();
            match items.get_mut(customer_id) {
                Some(customer) => {
                    customer.warehouse_ids.retain(|w| w != warehouse_id);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
