use std::sync::Arc;

use models::employee::{parse_id, Employee, EmployeeFields};
use tracing::{debug, info, instrument};

use crate::deadline::Deadline;
use crate::employee::repository::EmployeeStore;
use crate::errors::ServiceError;

/// Employee CRUD business service independent of the transport.
///
/// Every operation issues exactly one store call and holds no state between
/// requests; the store handle is shared by reference.
pub struct EmployeeService<S: EmployeeStore> {
    store: Arc<S>,
}

impl<S: EmployeeStore> Clone for EmployeeService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: EmployeeStore> EmployeeService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    /// Insert a new employee; the store assigns the id.
    ///
    /// # Examples
    /// ```
    /// use service::{Deadline, EmployeeService};
    /// use service::employee::{repository::mock::MockEmployeeStore, EmployeeFields};
    /// use std::sync::Arc;
    /// let svc = EmployeeService::new(Arc::new(MockEmployeeStore::default()));
    /// let fields = EmployeeFields { first_name: "Jane".into(), last_name: "Doe".into(), ..Default::default() };
    /// let created = tokio_test::block_on(svc.create(Deadline::none(), fields.clone())).unwrap();
    /// assert_eq!(created.fields, fields);
    /// assert_eq!(created.id.len(), 24);
    /// ```
    #[instrument(skip(self, fields))]
    pub async fn create(&self, deadline: Deadline, fields: EmployeeFields) -> Result<Employee, ServiceError> {
        let id = deadline.run(self.store.insert(&fields)).await?;
        info!(id = %id, "employee_created");
        Ok(Employee::new(id, fields))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, deadline: Deadline, id: &str) -> Result<Employee, ServiceError> {
        let oid = parse_id(id)?;
        let doc = deadline
            .run(self.store.find_one(oid))
            .await?
            .ok_or_else(|| ServiceError::employee_not_found(id))?;
        Ok(Employee::new(oid, doc.fields))
    }

    /// All employees in store order; an empty collection yields an empty list.
    #[instrument(skip(self))]
    pub async fn list(&self, deadline: Deadline) -> Result<Vec<Employee>, ServiceError> {
        let docs = deadline.run(self.store.find_all()).await?;
        let employees = docs
            .into_iter()
            .map(|doc| doc.into_employee().map_err(|e| ServiceError::db("decode", e)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = employees.len(), "employees_listed");
        Ok(employees)
    }

    /// Full replace of every non-id field. Echoes the input without re-reading.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, deadline: Deadline, id: &str, fields: EmployeeFields) -> Result<Employee, ServiceError> {
        let oid = parse_id(id)?;
        let matched = deadline.run(self.store.replace_one(oid, &fields)).await?;
        if matched == 0 {
            return Err(ServiceError::employee_not_found(id));
        }
        info!(id = %oid, "employee_updated");
        Ok(Employee::new(oid, fields))
    }

    /// Hard delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, deadline: Deadline, id: &str) -> Result<(), ServiceError> {
        let oid = parse_id(id)?;
        let deleted = deadline.run(self.store.delete_one(oid)).await?;
        if deleted == 0 {
            return Err(ServiceError::employee_not_found(id));
        }
        info!(id = %oid, "employee_deleted");
        Ok(())
    }
}
