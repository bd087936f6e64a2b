use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use common::types::Health;
use common::utils::serde_helpers::string_or_empty;
use proto::pb::{self, employee_service_client::EmployeeServiceClient};
use serde::{Deserialize, Serialize};
use tonic::transport::Channel;
use tonic::Request;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::GatewayError;

#[derive(Clone)]
pub struct GatewayState {
    pub client: EmployeeServiceClient<Channel>,
    /// Sent as `grpc-timeout` with every forwarded call.
    pub timeout: Duration,
}

impl GatewayState {
    pub fn new(client: EmployeeServiceClient<Channel>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.timeout);
        request
    }
}

/// JSON view of `employee.v1.Employee`; absent or `null` fields read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeBody {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub position: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub department: String,
}

impl From<pb::Employee> for EmployeeBody {
    fn from(e: pb::Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            position: e.position,
            department: e.department,
        }
    }
}

impl From<EmployeeBody> for pb::Employee {
    fn from(b: EmployeeBody) -> Self {
        Self {
            id: b.id,
            first_name: b.first_name,
            last_name: b.last_name,
            email: b.email,
            position: b.position,
            department: b.department,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeEnvelope {
    pub employee: EmployeeBody,
}

impl EmployeeEnvelope {
    fn from_pb(employee: Option<pb::Employee>) -> Result<Self, GatewayError> {
        let employee = employee.ok_or(GatewayError::MissingField("employee"))?;
        Ok(Self { employee: employee.into() })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeList {
    pub employees: Vec<EmployeeBody>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn create_employee(
    State(state): State<GatewayState>,
    body: Result<Json<EmployeeBody>, JsonRejection>,
) -> Result<Json<EmployeeEnvelope>, GatewayError> {
    let Json(body) = body?;
    let request = state.request(pb::CreateEmployeeRequest { employee: Some(body.into()) });
    let res = state.client.clone().create_employee(request).await?;
    Ok(Json(EmployeeEnvelope::from_pb(res.into_inner().employee)?))
}

pub async fn list_employees(State(state): State<GatewayState>) -> Result<Json<EmployeeList>, GatewayError> {
    let request = state.request(pb::ListEmployeesRequest {});
    let res = state.client.clone().list_employees(request).await?;
    let employees = res.into_inner().employees.into_iter().map(EmployeeBody::from).collect();
    Ok(Json(EmployeeList { employees }))
}

pub async fn get_employee(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeEnvelope>, GatewayError> {
    let request = state.request(pb::GetEmployeeRequest { id });
    let res = state.client.clone().get_employee(request).await?;
    Ok(Json(EmployeeEnvelope::from_pb(res.into_inner().employee)?))
}

/// The path id is authoritative; an `id` in the body is overwritten.
pub async fn update_employee(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    body: Result<Json<EmployeeBody>, JsonRejection>,
) -> Result<Json<EmployeeEnvelope>, GatewayError> {
    let Json(body) = body?;
    let mut employee = pb::Employee::from(body);
    employee.id = id;
    let request = state.request(pb::UpdateEmployeeRequest { employee: Some(employee) });
    let res = state.client.clone().update_employee(request).await?;
    Ok(Json(EmployeeEnvelope::from_pb(res.into_inner().employee)?))
}

pub async fn delete_employee(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, GatewayError> {
    let request = state.request(pb::DeleteEmployeeRequest { id });
    let res = state.client.clone().delete_employee(request).await?;
    Ok(Json(DeleteResult { success: res.into_inner().success }))
}

/// Build the gateway router: health plus the `/v1/employees` resource.
pub fn build_router(state: GatewayState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/employees", get(list_employees).post(create_employee))
        .route(
            "/v1/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
