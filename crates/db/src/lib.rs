pub mod datastore;
pub mod document;
pub mod fixtures;
pub mod repositories;

pub use datastore::JsonDatastore;
pub use document::{CustomerDocument, CustomerRecord};
pub use fixtures::{DemoSeedDataset, SeedResult, VerificationResult};
