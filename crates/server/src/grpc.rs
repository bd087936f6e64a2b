use std::time::Duration;

use models::employee::{Employee, EmployeeFields};
use proto::pb::{
    self,
    employee_service_server::{EmployeeService as EmployeeRpc, EmployeeServiceServer},
};
use service::employee::repository::EmployeeStore;
use service::errors::ServiceError;
use service::{Deadline, EmployeeService};
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};
use tracing::info;

use crate::errors::to_status;

/// tonic adapter: decodes envelopes, attaches the request deadline and maps
/// service outcomes to gRPC statuses.
pub struct EmployeeGrpc<S: EmployeeStore> {
    service: EmployeeService<S>,
    max_timeout: Option<Duration>,
}

impl<S: EmployeeStore + 'static> EmployeeGrpc<S> {
    pub fn new(service: EmployeeService<S>, max_timeout: Option<Duration>) -> Self {
        Self { service, max_timeout }
    }

    pub fn into_server(self) -> EmployeeServiceServer<Self> {
        EmployeeServiceServer::new(self)
    }

    fn deadline(&self, metadata: &MetadataMap) -> Deadline {
        Deadline::from_timeouts(grpc_timeout(metadata), self.max_timeout)
    }
}

#[tonic::async_trait]
impl<S: EmployeeStore + 'static> EmployeeRpc for EmployeeGrpc<S> {
    async fn create_employee(
        &self,
        request: Request<pb::CreateEmployeeRequest>,
    ) -> Result<Response<pb::CreateEmployeeResponse>, Status> {
        const RPC: &str = "CreateEmployee";
        info!(rpc = RPC, "rpc_called");
        let deadline = self.deadline(request.metadata());
        let employee = require_employee(request.into_inner().employee).map_err(|e| to_status(RPC, e))?;

        let created = self
            .service
            .create(deadline, fields_from_pb(employee))
            .await
            .map_err(|e| to_status(RPC, e))?;
        Ok(Response::new(pb::CreateEmployeeResponse { employee: Some(employee_to_pb(created)) }))
    }

    async fn get_employee(
        &self,
        request: Request<pb::GetEmployeeRequest>,
    ) -> Result<Response<pb::GetEmployeeResponse>, Status> {
        const RPC: &str = "GetEmployee";
        info!(rpc = RPC, "rpc_called");
        let deadline = self.deadline(request.metadata());
        let id = request.into_inner().id;

        let found = self.service.get(deadline, &id).await.map_err(|e| to_status(RPC, e))?;
        Ok(Response::new(pb::GetEmployeeResponse { employee: Some(employee_to_pb(found)) }))
    }

    async fn list_employees(
        &self,
        request: Request<pb::ListEmployeesRequest>,
    ) -> Result<Response<pb::ListEmployeesResponse>, Status> {
        const RPC: &str = "ListEmployees";
        info!(rpc = RPC, "rpc_called");
        let deadline = self.deadline(request.metadata());

        let employees = self.service.list(deadline).await.map_err(|e| to_status(RPC, e))?;
        Ok(Response::new(pb::ListEmployeesResponse {
            employees: employees.into_iter().map(employee_to_pb).collect(),
        }))
    }

    async fn update_employee(
        &self,
        request: Request<pb::UpdateEmployeeRequest>,
    ) -> Result<Response<pb::UpdateEmployeeResponse>, Status> {
        const RPC: &str = "UpdateEmployee";
        info!(rpc = RPC, "rpc_called");
        let deadline = self.deadline(request.metadata());
        let employee = require_employee(request.into_inner().employee).map_err(|e| to_status(RPC, e))?;
        let id = employee.id.clone();

        let updated = self
            .service
            .update(deadline, &id, fields_from_pb(employee))
            .await
            .map_err(|e| to_status(RPC, e))?;
        Ok(Response::new(pb::UpdateEmployeeResponse { employee: Some(employee_to_pb(updated)) }))
    }

    async fn delete_employee(
        &self,
        request: Request<pb::DeleteEmployeeRequest>,
    ) -> Result<Response<pb::DeleteEmployeeResponse>, Status> {
        const RPC: &str = "DeleteEmployee";
        info!(rpc = RPC, "rpc_called");
        let deadline = self.deadline(request.metadata());
        let id = request.into_inner().id;

        self.service.delete(deadline, &id).await.map_err(|e| to_status(RPC, e))?;
        Ok(Response::new(pb::DeleteEmployeeResponse { success: true }))
    }
}

fn require_employee(employee: Option<pb::Employee>) -> Result<pb::Employee, ServiceError> {
    employee.ok_or_else(|| ServiceError::Validation("employee is required".into()))
}

/// Caller-supplied `id` is dropped: on create the store assigns it, on
/// update it is carried separately.
pub fn fields_from_pb(employee: pb::Employee) -> EmployeeFields {
    EmployeeFields {
        first_name: employee.first_name,
        last_name: employee.last_name,
        email: employee.email,
        position: employee.position,
        department: employee.department,
    }
}

pub fn employee_to_pb(employee: Employee) -> pb::Employee {
    let Employee { id, fields } = employee;
    pb::Employee {
        id,
        first_name: fields.first_name,
        last_name: fields.last_name,
        email: fields.email,
        position: fields.position,
        department: fields.department,
    }
}

/// Parse the `grpc-timeout` request header: at most 8 digits followed by a
/// unit (`H`, `M`, `S`, `m`, `u`, `n`). Malformed values are ignored.
pub fn grpc_timeout(metadata: &MetadataMap) -> Option<Duration> {
    let raw = metadata.get("grpc-timeout")?.to_str().ok()?;
    parse_grpc_timeout(raw)
}

fn parse_grpc_timeout(raw: &str) -> Option<Duration> {
    if raw.len() < 2 {
        return None;
    }
    let (digits, unit) = raw.split_at(raw.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    let duration = match unit {
        "H" => Duration::from_secs(value * 60 * 60),
        "M" => Duration::from_secs(value * 60),
        "S" => Duration::from_secs(value),
        "m" => Duration::from_millis(value),
        "u" => Duration::from_micros(value),
        "n" => Duration::from_nanos(value),
        _ => return None,
    };
    Some(duration)
}
