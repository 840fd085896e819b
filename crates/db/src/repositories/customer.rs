use std::path::{Path, PathBuf};

use async_trait::async_trait;
use grocery_core::domain::customer::CustomerId;
use tokio::sync::RwLock;
use tracing::info;

use super::{CustomerRepository, RepositoryError};
use crate::datastore::JsonDatastore;
use crate::document::CustomerRecord;

/// File-backed repository over a single JSON document.
///
/// Mutations hold the write guard for their whole read-modify-write cycle, so `add`,
/// `update` and `delete` are linearizable with respect to each other. Reads share the read
/// guard and never see a partially written document.
pub struct JsonFileCustomerRepository {
    datastore: RwLock<JsonDatastore>,
}

impl JsonFileCustomerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { datastore: RwLock::new(JsonDatastore::new(path)) }
    }
}

#[async_trait]
impl CustomerRepository for JsonFileCustomerRepository {
    async fn get_all(&self) -> Result<Vec<CustomerRecord>, RepositoryError> {
        let datastore = self.datastore.read().await;
        Ok(datastore.load().await?.into_records())
    }

    async fn get_by_id(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        let datastore = self.datastore.read().await;
        Ok(datastore.load().await?.find(id).cloned())
    }

    async fn add(&self, record: CustomerRecord) -> Result<CustomerRecord, RepositoryError> {
        let datastore = self.datastore.write().await;
        let mut document = datastore.load().await?;
        let stored = document.insert(record.name)?;
        datastore.save(&document).await?;

        log_mutation("db.customer.added", datastore.path(), stored.id);
        Ok(stored)
    }

    async fn update(&self, record: CustomerRecord) -> Result<(), RepositoryError> {
        let datastore = self.datastore.write().await;
        let mut document = datastore.load().await?;
        document.rename(record.id, record.name)?;
        datastore.save(&document).await?;

        log_mutation("db.customer.updated", datastore.path(), record.id);
        Ok(())
    }

    async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let datastore = self.datastore.write().await;
        let mut document = datastore.load().await?;
        document.remove(id)?;
        datastore.save(&document).await?;

        log_mutation("db.customer.deleted", datastore.path(), id);
        Ok(())
    }
}

fn log_mutation(event_name: &'static str, path: &Path, id: CustomerId) {
    info!(event_name, customer_id = %id, path = %path.display(), "customer datastore mutated");
}
