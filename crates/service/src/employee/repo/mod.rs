pub mod mongo;

pub use mongo::MongoEmployeeStore;
