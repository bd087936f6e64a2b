//! Employee records: store abstraction, store implementations and the service.

pub mod repository;
pub mod repo;
pub mod service;

pub use models::employee::{Employee, EmployeeFields};
pub use service::EmployeeService;
