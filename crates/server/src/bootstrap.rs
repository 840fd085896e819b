use std::sync::Arc;

use axum::Router;
use grocery_core::config::{AppConfig, ConfigError};
use grocery_db::repositories::{CustomerRepository, JsonFileCustomerRepository, RepositoryError};
use thiserror::Error;
use tracing::info;

use crate::{router, service::CustomerService};

pub struct Application {
    pub config: AppConfig,
    pub repository: Arc<dyn CustomerRepository>,
    pub service: Arc<CustomerService>,
}

impl Application {
    pub fn router(&self) -> Router {
        router::build(self.service.clone(), self.repository.clone(), &self.config.cors)
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("datastore is not readable: {0}")]
    Datastore(#[source] RepositoryError),
}

pub async fn bootstrap(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        storage_path = %config.storage.path.display(),
        "starting application bootstrap"
    );
    config.validate()?;

    let repository: Arc<dyn CustomerRepository> =
        Arc::new(JsonFileCustomerRepository::new(config.storage.path.clone()));

    let existing = repository.get_all().await.map_err(BootstrapError::Datastore)?;
    info!(
        event_name = "system.bootstrap.datastore_ready",
        correlation_id = "bootstrap",
        customer_count = existing.len(),
        "customer datastore readable"
    );

    let service = Arc::new(CustomerService::new(repository.clone()));

    Ok(Application { config, repository, service })
}
