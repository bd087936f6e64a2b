use mongodb::bson::oid::ObjectId;
use common::utils::serde_helpers::string_or_empty;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// The five caller-supplied attributes of an employee.
///
/// Stored as given: no uniqueness or format rules apply, empty strings included.
/// A `null` written by another client reads back as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFields {
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

/// Employee as returned to callers: fields plus the hex-encoded store id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Employee {
    pub id: String,
    pub fields: EmployeeFields,
}

impl Employee {
    pub fn new(id: ObjectId, fields: EmployeeFields) -> Self {
        Self { id: id.to_hex(), fields }
    }
}

/// Shape of a record in the `employees` collection.
///
/// `_id` is left out on insert so the store assigns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub fields: EmployeeFields,
}

impl EmployeeDocument {
    pub fn new(fields: EmployeeFields) -> Self {
        Self { id: None, fields }
    }

    /// Convert a stored document into the caller view. A document read back
    /// from the store always carries `_id`; one without it is a decode failure.
    pub fn into_employee(self) -> Result<Employee, ModelError> {
        let id = self
            .id
            .ok_or_else(|| ModelError::Db("stored employee document has no _id".into()))?;
        Ok(Employee::new(id, self.fields))
    }
}

/// Parse a caller-supplied id into the store-native identifier.
pub fn parse_id(id: &str) -> Result<ObjectId, ModelError> {
    ObjectId::parse_str(id).map_err(|e| ModelError::InvalidId {
        id: id.to_string(),
        reason: e.to_string(),
    })
}
