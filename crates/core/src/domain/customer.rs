use std::fmt;

use serde::{Deserialize, Serialize};

/// Repository-assigned customer identifier. Unassigned or invalid ids are `<= 0`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CustomerId(pub i64);

impl CustomerId {
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Public customer shape shared by the service and HTTP layers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

impl Customer {
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }

    /// A customer that has not been stored yet; the repository assigns its id.
    pub fn unsaved(name: impl Into<String>) -> Self {
        Self { id: CustomerId::default(), name: name.into() }
    }
}
