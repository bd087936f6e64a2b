//! Demo client: walks one employee through create, list, update, list, delete, list.

use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use proto::pb::{self, employee_service_client::EmployeeServiceClient};
use tonic::Request;
use tracing::info;

const CALL_TIMEOUT: Duration = Duration::from_secs(5);

fn call<T>(message: T) -> Request<T> {
    let mut request = Request::new(message);
    request.set_timeout(CALL_TIMEOUT);
    request
}

fn summary(e: &pb::Employee) -> String {
    format!("{} {} <{}> {} / {} [{}]", e.first_name, e.last_name, e.email, e.position, e.department, e.id)
}

async fn log_all(client: &mut EmployeeServiceClient<tonic::transport::Channel>, step: &str) -> anyhow::Result<()> {
    let employees = client.list_employees(call(pb::ListEmployeesRequest {})).await?.into_inner().employees;
    info!(step, count = employees.len(), "listed employees");
    for e in &employees {
        info!(step, employee = %summary(e), "employee");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    let endpoint = std::env::var("GRPC_ENDPOINT").unwrap_or_else(|_| "http://127.0.0.1:50051".to_string());
    let mut client = EmployeeServiceClient::connect(endpoint.clone())
        .await
        .with_context(|| format!("did not connect to {endpoint}"))?;

    let created = client
        .create_employee(call(pb::CreateEmployeeRequest {
            employee: Some(pb::Employee {
                id: String::new(),
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jane.doe@example.com".into(),
                position: "Software Engineer".into(),
                department: "Engineering".into(),
            }),
        }))
        .await
        .context("could not create employee")?
        .into_inner()
        .employee
        .context("create response carried no employee")?;
    info!(employee = %summary(&created), "created employee");
    log_all(&mut client, "after_create").await?;

    let updated = client
        .update_employee(call(pb::UpdateEmployeeRequest {
            employee: Some(pb::Employee {
                id: created.id.clone(),
                first_name: "Jane".into(),
                last_name: "Smith".into(),
                email: "jane.smith@example.com".into(),
                position: "Senior Manager".into(),
                department: "Management".into(),
            }),
        }))
        .await
        .context("could not update employee")?
        .into_inner()
        .employee
        .context("update response carried no employee")?;
    info!(employee = %summary(&updated), "updated employee");
    log_all(&mut client, "after_update").await?;

    client
        .delete_employee(call(pb::DeleteEmployeeRequest { id: created.id.clone() }))
        .await
        .context("could not delete employee")?;
    info!(id = %created.id, "deleted employee");
    log_all(&mut client, "after_delete").await?;
    Ok(())
}
