//! Employee entity, its store document shape and datastore connection handling.

pub mod errors;
pub mod db;
pub mod employee;

pub use mongodb::bson::oid::ObjectId;
