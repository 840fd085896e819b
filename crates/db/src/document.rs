//! Storage shape of the customer datastore.
//!
//! The file holds a single object with one array field:
//! `{ "Customers": [ { "Id": 1, "Name": "Tom" } ] }`. Record order is insertion order.

use grocery_core::domain::customer::CustomerId;
use serde::{Deserialize, Serialize};

use crate::repositories::RepositoryError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
}

impl CustomerRecord {
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    fn has_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct CustomerDocument {
    #[serde(rename = "Customers")]
    customers: Vec<CustomerRecord>,
}

// A missing or `null` array is an empty store.
#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "Customers", default)]
    customers: Option<Vec<CustomerRecord>>,
}

impl From<RawDocument> for CustomerDocument {
    fn from(raw: RawDocument) -> Self {
        Self { customers: raw.customers.unwrap_or_default() }
    }
}

impl CustomerDocument {
    pub fn from_records(customers: Vec<CustomerRecord>) -> Self {
        Self { customers }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.customers
    }

    pub fn into_records(self) -> Vec<CustomerRecord> {
        self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn find(&self, id: CustomerId) -> Option<&CustomerRecord> {
        self.customers.iter().find(|record| record.id == id)
    }

    pub fn next_id(&self) -> Result<CustomerId, RepositoryError> {
        let max = self.customers.iter().map(|record| record.id.0).max().unwrap_or(0);
        max.checked_add(1)
            .map(CustomerId)
            .ok_or(RepositoryError::IdsExhausted { max: CustomerId(max) })
    }

    /// Appends a record under the next free id. Fails on a case-insensitive name clash.
    pub fn insert(&mut self, name: String) -> Result<CustomerRecord, RepositoryError> {
        if self.customers.iter().any(|record| record.has_name(&name)) {
            return Err(RepositoryError::Duplicate { name });
        }

        let record = CustomerRecord { id: self.next_id()?, name };
        self.customers.push(record.clone());
        Ok(record)
    }

    /// Replaces the name of an existing record in place; the id never changes.
    pub fn rename(&mut self, id: CustomerId, name: String) -> Result<(), RepositoryError> {
        let position = self
            .customers
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepositoryError::NotFound { id })?;

        let clashes =
            self.customers.iter().any(|record| record.id != id && record.has_name(&name));
        if clashes {
            return Err(RepositoryError::Duplicate { name });
        }

        self.customers[position].name = name;
        Ok(())
    }

    pub fn remove(&mut self, id: CustomerId) -> Result<CustomerRecord, RepositoryError> {
        let position = self
            .customers
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepositoryError::NotFound { id })?;

        Ok(self.customers.remove(position))
    }
}

pub fn same_name(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
