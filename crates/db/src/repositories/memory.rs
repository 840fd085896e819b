use tokio::sync::RwLock;

use grocery_core::domain::customer::CustomerId;

use super::{CustomerRepository, RepositoryError};
use crate::document::{CustomerDocument, CustomerRecord};

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    document: RwLock<CustomerDocument>,
}

impl InMemoryCustomerRepository {
    pub fn with_records(records: Vec<CustomerRecord>) -> Self {
        Self { document: RwLock::new(CustomerDocument::from_records(records)) }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_all(&self) -> Result<Vec<CustomerRecord>, RepositoryError> {
        let document = self.document.read().await;
        Ok(document.records().to_vec())
    }

    async fn get_by_id(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError> {
        let document = self.document.read().await;
        Ok(document.find(id).cloned())
    }

    async fn add(&self, record: CustomerRecord) -> Result<CustomerRecord, RepositoryError> {
        let mut document = self.document.write().await;
        document.insert(record.name)
    }

    async fn update(&self, record: CustomerRecord) -> Result<(), RepositoryError> {
        let mut document = self.document.write().await;
        document.rename(record.id, record.name)
    }

    async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let mut document = self.document.write().await;
        document.remove(id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use grocery_core::domain::customer::CustomerId;

    use crate::document::CustomerRecord;
    use crate::repositories::{CustomerRepository, InMemoryCustomerRepository, RepositoryError};

    #[tokio::test]
    async fn in_memory_customer_repo_round_trip() {
        let repo = InMemoryCustomerRepository::default();

        let stored = repo.add(CustomerRecord::new(0, "Tom")).await.expect("add customer");
        let found = repo.get_by_id(stored.id).await.expect("find customer");

        assert_eq!(found, Some(CustomerRecord::new(1, "Tom")));
    }

    #[tokio::test]
    async fn in_memory_repo_enforces_same_invariants_as_file_repo() {
        let repo = InMemoryCustomerRepository::with_records(vec![
            CustomerRecord::new(1, "Tom"),
            CustomerRecord::new(2, "Smith"),
        ]);

        assert!(matches!(
            repo.add(CustomerRecord::new(0, "SMITH")).await,
            Err(RepositoryError::Duplicate { .. })
        ));
        assert!(matches!(
            repo.update(CustomerRecord::new(9, "Nobody")).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(repo.delete(CustomerId(9)).await, Err(RepositoryError::NotFound { .. })));

        repo.delete(CustomerId(1)).await.expect("delete");
        assert_eq!(repo.get_all().await.expect("list"), vec![CustomerRecord::new(2, "Smith")]);
    }
}
