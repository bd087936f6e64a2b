//! HTTP/JSON gateway in front of the employee gRPC service.
//!
//! Each REST route forwards to the matching RPC over a lazily dialed tonic
//! channel and maps the returned gRPC status back onto an HTTP status.

pub mod bootstrap;
pub mod errors;
pub mod routes;
