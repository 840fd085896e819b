use std::path::PathBuf;

use async_trait::async_trait;
use grocery_core::domain::customer::CustomerId;
use grocery_core::errors::ApplicationError;
use thiserror::Error;

use crate::document::CustomerRecord;

pub mod customer;
pub mod memory;

pub use customer::JsonFileCustomerRepository;
pub use memory::InMemoryCustomerRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("customer `{name}` already exists")]
    Duplicate { name: String },
    #[error("customer {id} not found")]
    NotFound { id: CustomerId },
    #[error("no customer id is available after {max}")]
    IdsExhausted { max: CustomerId },
    #[error("could not read datastore `{path}`: {source}")]
    StorageRead { path: PathBuf, source: std::io::Error },
    #[error("could not parse datastore `{path}`: {source}")]
    Decode { path: PathBuf, source: serde_json::Error },
    #[error("could not encode datastore `{path}`: {source}")]
    Encode { path: PathBuf, source: serde_json::Error },
    #[error("could not write datastore `{path}`: {source}")]
    StorageWrite { path: PathBuf, source: std::io::Error },
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Duplicate { .. } => Self::Duplicate(error.to_string()),
            RepositoryError::NotFound { .. } => Self::NotFound(error.to_string()),
            RepositoryError::StorageRead { .. }
            | RepositoryError::Decode { .. }
            | RepositoryError::Encode { .. }
            | RepositoryError::StorageWrite { .. }
            | RepositoryError::IdsExhausted { .. } => Self::Persistence(error.to_string()),
        }
    }
}

/// Persistence capability for customer records.
///
/// Implementations enforce the storage invariants: ids are assigned on `add` as
/// `max + 1`, names are unique case-insensitively, and `update`/`delete` on an unknown id
/// fail with [`RepositoryError::NotFound`] without writing anything.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<CustomerRecord>, RepositoryError>;

    async fn get_by_id(&self, id: CustomerId) -> Result<Option<CustomerRecord>, RepositoryError>;

    /// Stores a new record, ignoring any id it carries, and returns it with its assigned id.
    async fn add(&self, record: CustomerRecord) -> Result<CustomerRecord, RepositoryError>;

    async fn update(&self, record: CustomerRecord) -> Result<(), RepositoryError>;

    async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError>;
}
