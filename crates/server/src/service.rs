//! Customer use cases: validation first, then storage through the repository.
//!
//! Validation collects every violation of a request and fails with
//! [`DomainError::Validation`](grocery_core::errors::DomainError) before the repository is
//! touched. Duplicate and not-found failures raised by the repository pass through unchanged.

use std::sync::Arc;

use grocery_core::domain::customer::{Customer, CustomerId};
use grocery_core::errors::ApplicationError;
use grocery_core::validation::{validate_existing_customer, validate_id, validate_new_customer};
use grocery_db::repositories::CustomerRepository;
use grocery_db::CustomerRecord;

#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> Result<Vec<Customer>, ApplicationError> {
        let records = self.repository.get_all().await?;
        Ok(records.into_iter().map(to_customer).collect())
    }

    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, ApplicationError> {
        validate_id(id)?;

        let record = self.repository.get_by_id(id).await?;
        Ok(record.map(to_customer))
    }

    pub async fn add(&self, customer: Customer) -> Result<Customer, ApplicationError> {
        validate_new_customer(&customer)?;

        let stored = self.repository.add(to_new_record(&customer)).await?;
        Ok(to_customer(stored))
    }

    pub async fn update(&self, customer: Customer) -> Result<(), ApplicationError> {
        validate_existing_customer(&customer)?;

        self.repository.update(to_existing_record(&customer)).await?;
        Ok(())
    }

    pub async fn delete(&self, id: CustomerId) -> Result<(), ApplicationError> {
        validate_id(id)?;

        self.repository.delete(id).await?;
        Ok(())
    }
}

// The repository assigns ids on create; the client's id never reaches storage.
fn to_new_record(customer: &Customer) -> CustomerRecord {
    CustomerRecord::new(CustomerId::default(), customer.name.trim())
}

fn to_existing_record(customer: &Customer) -> CustomerRecord {
    CustomerRecord::new(customer.id, customer.name.trim())
}

fn to_customer(record: CustomerRecord) -> Customer {
    Customer { id: record.id, name: record.name }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use grocery_core::domain::customer::{Customer, CustomerId};
    use grocery_core::errors::{ApplicationError, DomainError};
    use grocery_db::repositories::{CustomerRepository, InMemoryCustomerRepository, RepositoryError};
    use grocery_db::CustomerRecord;

    use super::CustomerService;

    /// Wraps the in-memory repository and counts how often storage was reached.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryCustomerRepository,
        calls: AtomicUsize,
        last_added: std::sync::Mutex<Option<CustomerRecord>>,
    }

    impl CountingRepository {
        fn seeded(records: Vec<CustomerRecord>) -> Self {
            Self { inner: InMemoryCustomerRepository::with_records(records), ..Self::default() }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CustomerRepository for CountingRepository {
        async fn get_all(&self) -> Result<Vec<CustomerRecord>, RepositoryError> {
            self.touch();
            self.inner.get_all().await
        }

        async fn get_by_id(
            &self,
            id: CustomerId,
        ) -> Result<Option<CustomerRecord>, RepositoryError> {
            self.touch();
            self.inner.get_by_id(id).await
        }

        async fn add(&self, record: CustomerRecord) -> Result<CustomerRecord, RepositoryError> {
            self.touch();
            if let Ok(mut last) = self.last_added.lock() {
                *last = Some(record.clone());
            }
            self.inner.add(record).await
        }

        async fn update(&self, record: CustomerRecord) -> Result<(), RepositoryError> {
            self.touch();
            self.inner.update(record).await
        }

        async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
            self.touch();
            self.inner.delete(id).await
        }
    }

    fn service_with(repo: &Arc<CountingRepository>) -> CustomerService {
        CustomerService::new(repo.clone())
    }

    fn seeded() -> Arc<CountingRepository> {
        Arc::new(CountingRepository::seeded(vec![
            CustomerRecord::new(1, "Tom"),
            CustomerRecord::new(2, "Smith"),
            CustomerRecord::new(3, "Richard"),
        ]))
    }

    fn violations(error: ApplicationError) -> Vec<String> {
        match error {
            ApplicationError::Domain(DomainError::Validation(violations)) => violations,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_all_maps_every_record_in_order() {
        let repo = seeded();

        let customers = service_with(&repo).get_all().await.expect("list");

        assert_eq!(
            customers,
            vec![Customer::new(1, "Tom"), Customer::new(2, "Smith"), Customer::new(3, "Richard")]
        );
    }

    #[tokio::test]
    async fn get_all_passes_through_empty_store() {
        let repo = Arc::new(CountingRepository::default());

        assert!(service_with(&repo).get_all().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn get_by_id_returns_found_and_absent() {
        let repo = seeded();
        let service = service_with(&repo);

        assert_eq!(
            service.get_by_id(CustomerId(3)).await.expect("lookup"),
            Some(Customer::new(3, "Richard"))
        );
        assert_eq!(service.get_by_id(CustomerId(99)).await.expect("lookup"), None);
    }

    #[tokio::test]
    async fn get_by_id_rejects_non_positive_id_without_storage_access() {
        let repo = seeded();

        let error = service_with(&repo).get_by_id(CustomerId(0)).await.expect_err("invalid id");

        assert_eq!(violations(error), vec!["id is required".to_string()]);
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn add_then_lookup_returns_new_positive_id() {
        let repo = seeded();
        let service = service_with(&repo);

        let created = service.add(Customer::unsaved("Ann")).await.expect("add");

        assert_eq!(created, Customer::new(4, "Ann"));
        assert_eq!(service.get_by_id(created.id).await.expect("lookup"), Some(created));
    }

    #[tokio::test]
    async fn add_never_forwards_client_id_and_trims_name() {
        let repo = seeded();

        let created = service_with(&repo).add(Customer::new(77, "  Ann  ")).await.expect("add");

        assert_eq!(created, Customer::new(4, "Ann"));
        let forwarded = repo.last_added.lock().expect("lock").clone();
        assert_eq!(forwarded, Some(CustomerRecord::new(0, "Ann")));
    }

    #[tokio::test]
    async fn add_rejects_blank_name() {
        let repo = seeded();

        let error = service_with(&repo).add(Customer::unsaved("   ")).await.expect_err("blank");

        assert_eq!(violations(error), vec!["name is required".to_string()]);
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn add_propagates_duplicate_unchanged() {
        let repo = seeded();
        let service = service_with(&repo);

        let error = service.add(Customer::unsaved("tom")).await.expect_err("duplicate");

        assert!(matches!(error, ApplicationError::Duplicate(_)));
        assert_eq!(service.get_all().await.expect("list").len(), 3);
    }

    #[tokio::test]
    async fn update_reports_both_violations() {
        let repo = seeded();

        let error = service_with(&repo).update(Customer::new(-1, "")).await.expect_err("invalid");

        assert_eq!(
            violations(error),
            vec!["id is required".to_string(), "name is required".to_string()]
        );
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn update_changes_name_and_keeps_id() {
        let repo = seeded();
        let service = service_with(&repo);

        service.update(Customer::new(2, "Smithers")).await.expect("update");

        assert_eq!(
            service.get_by_id(CustomerId(2)).await.expect("lookup"),
            Some(Customer::new(2, "Smithers"))
        );
    }

    #[tokio::test]
    async fn update_of_missing_customer_is_not_found() {
        let repo = seeded();

        let error = service_with(&repo).update(Customer::new(9, "Nobody")).await.expect_err("nf");

        assert!(matches!(error, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_validates_then_removes_exactly_one() {
        let repo = seeded();
        let service = service_with(&repo);

        let error = service.delete(CustomerId(0)).await.expect_err("invalid id");
        assert_eq!(violations(error), vec!["id is required".to_string()]);

        service.delete(CustomerId(2)).await.expect("delete");
        assert_eq!(
            service.get_all().await.expect("list"),
            vec![Customer::new(1, "Tom"), Customer::new(3, "Richard")]
        );

        let missing = service.delete(CustomerId(2)).await.expect_err("already deleted");
        assert!(matches!(missing, ApplicationError::NotFound(_)));
    }
}
