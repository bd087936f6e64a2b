//! Service layer for employee records.
//! - Validates identifiers before any store access.
//! - Talks to the datastore only through [`employee::repository::EmployeeStore`].
//! - Classifies every outcome into a [`errors::ServiceError`] the transports map to status codes.

pub mod errors;
pub mod deadline;
pub mod employee;

pub use deadline::Deadline;
pub use employee::EmployeeService;
