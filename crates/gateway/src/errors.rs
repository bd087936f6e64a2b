use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tonic::{Code, Status};
use tracing::error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{}", .0.message())]
    Rpc(#[from] Status),
    #[error("upstream response is missing `{0}`")]
    MissingField(&'static str),
    /// Request body that is not a JSON employee.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
}

impl GatewayError {
    pub fn code(&self) -> Code {
        match self {
            GatewayError::Rpc(status) => status.code(),
            GatewayError::MissingField(_) => Code::Internal,
            GatewayError::Body(_) => Code::InvalidArgument,
        }
    }
}

/// HTTP status for a gRPC code.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        // Client closed request
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = http_status(code);
        let msg = self.to_string();
        if status.is_server_error() {
            error!(grpc_code = ?code, error = %msg, "gateway request failed");
        }
        (status, Json(serde_json::json!({ "code": code as i32, "message": msg, "details": [] }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_codes() {
        assert_eq!(http_status(Code::InvalidArgument), StatusCode::BAD_REQUEST);
        assert_eq!(http_status(Code::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(http_status(Code::Internal), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http_status(Code::DeadlineExceeded), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(http_status(Code::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(http_status(Code::Cancelled).as_u16(), 499);
    }

    #[test]
    fn rpc_error_keeps_status_message() {
        let err = GatewayError::from(Status::not_found("Employee not found with ID: abc"));
        assert_eq!(err.code(), Code::NotFound);
        assert_eq!(err.to_string(), "Employee not found with ID: abc");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_field_is_internal() {
        let resp = GatewayError::MissingField("employee").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
