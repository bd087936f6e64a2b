pub mod errors;
pub mod grpc;
pub mod startup;

pub use startup::run;
