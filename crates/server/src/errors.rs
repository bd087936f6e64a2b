use models::errors::ModelError;
use service::errors::ServiceError;
use tonic::{Code, Status};
use tracing::{error, warn};

/// gRPC code for a service outcome.
pub fn code_for(err: &ServiceError) -> Code {
    match err {
        ServiceError::Validation(_) | ServiceError::Model(ModelError::InvalidId { .. }) => Code::InvalidArgument,
        ServiceError::NotFound(_) => Code::NotFound,
        ServiceError::DeadlineExceeded => Code::DeadlineExceeded,
        ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)) => Code::Internal,
    }
}

/// Translate a service error into the status returned to the caller.
/// Store failures are logged here, once, with the wrapped cause.
pub fn to_status(rpc: &'static str, err: ServiceError) -> Status {
    let code = code_for(&err);
    match code {
        Code::Internal => error!(rpc, err = %err, "rpc_failed"),
        Code::DeadlineExceeded => warn!(rpc, "rpc_deadline_exceeded"),
        _ => {}
    }
    Status::new(code, err.to_string())
}
