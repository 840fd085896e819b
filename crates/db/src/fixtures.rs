use crate::document::CustomerRecord;
use crate::repositories::{CustomerRepository, RepositoryError};

/// Demo customers loaded by `grocery seed`.
const DEMO_CUSTOMERS: &[&str] = &["Tom", "Smith", "Richard"];

pub struct DemoSeedDataset;

impl DemoSeedDataset {
    /// Adds every demo customer that is not already present. Re-running is a no-op.
    pub async fn load(repository: &dyn CustomerRepository) -> Result<SeedResult, RepositoryError> {
        let mut result = SeedResult::default();

        for name in DEMO_CUSTOMERS {
            match repository.add(CustomerRecord::new(0, *name)).await {
                Ok(record) => result.added.push(record),
                Err(RepositoryError::Duplicate { .. }) => result.skipped.push(*name),
                Err(error) => return Err(error),
            }
        }

        Ok(result)
    }

    pub async fn verify(
        repository: &dyn CustomerRepository,
    ) -> Result<VerificationResult, RepositoryError> {
        let stored = repository.get_all().await?;
        let checks: Vec<(&'static str, bool)> = DEMO_CUSTOMERS
            .iter()
            .map(|name| {
                let present =
                    stored.iter().any(|record| crate::document::same_name(&record.name, name));
                (*name, present)
            })
            .collect();

        Ok(VerificationResult { all_present: checks.iter().all(|(_, ok)| *ok), checks })
    }
}

#[derive(Debug, Default)]
pub struct SeedResult {
    pub added: Vec<CustomerRecord>,
    pub skipped: Vec<&'static str>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
