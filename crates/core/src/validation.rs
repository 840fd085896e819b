use crate::domain::customer::{Customer, CustomerId};
use crate::errors::DomainError;

pub const CUSTOMER_ID_REQUIRED: &str = "id is required";
pub const CUSTOMER_NAME_REQUIRED: &str = "name is required";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomerViolation {
    IdRequired,
    NameRequired,
}

impl CustomerViolation {
    pub fn message(self) -> &'static str {
        match self {
            Self::IdRequired => CUSTOMER_ID_REQUIRED,
            Self::NameRequired => CUSTOMER_NAME_REQUIRED,
        }
    }
}

/// Collects every violation of a request before deciding whether it may proceed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Violations {
    entries: Vec<CustomerViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_id(&mut self, id: CustomerId) -> &mut Self {
        if !id.is_valid() {
            self.entries.push(CustomerViolation::IdRequired);
        }
        self
    }

    pub fn check_name(&mut self, name: &str) -> &mut Self {
        if name.trim().is_empty() {
            self.entries.push(CustomerViolation::NameRequired);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|violation| violation.message().to_string()).collect()
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error carrying every message.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.messages()))
        }
    }
}

pub fn validate_id(id: CustomerId) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.check_id(id);
    violations.into_result()
}

pub fn validate_new_customer(customer: &Customer) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.check_name(&customer.name);
    violations.into_result()
}

pub fn validate_existing_customer(customer: &Customer) -> Result<(), DomainError> {
    let mut violations = Violations::new();
    violations.check_id(customer.id).check_name(&customer.name);
    violations.into_result()
}
