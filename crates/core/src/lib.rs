pub mod config;
pub mod domain;
pub mod errors;
pub mod validation;

pub use domain::customer::{Customer, CustomerId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use validation::{CustomerViolation, Violations};
