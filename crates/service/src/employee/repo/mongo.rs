use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use models::employee::{EmployeeDocument, EmployeeFields};
use models::ObjectId;

use crate::employee::repository::EmployeeStore;
use crate::errors::ServiceError;

/// MongoDB-backed store over the `employees` collection.
#[derive(Clone)]
pub struct MongoEmployeeStore {
    pub collection: Collection<EmployeeDocument>,
}

impl MongoEmployeeStore {
    pub fn new(collection: Collection<EmployeeDocument>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl EmployeeStore for MongoEmployeeStore {
    async fn insert(&self, fields: &EmployeeFields) -> Result<ObjectId, ServiceError> {
        let res = self
            .collection
            .insert_one(EmployeeDocument::new(fields.clone()))
            .await
            .map_err(|e| ServiceError::db("create", e))?;
        res.inserted_id
            .as_object_id()
            .ok_or_else(|| ServiceError::Db("Failed to get inserted ID".into()))
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<EmployeeDocument>, ServiceError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::db("find", e))
    }

    async fn find_all(&self) -> Result<Vec<EmployeeDocument>, ServiceError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| ServiceError::db("retrieve", e))?;
        // Any decode or getMore failure discards what was read so far.
        cursor
            .try_collect()
            .await
            .map_err(|e| ServiceError::db("decode", e))
    }

    async fn replace_one(&self, id: ObjectId, fields: &EmployeeFields) -> Result<u64, ServiceError> {
        let res = self
            .collection
            .replace_one(doc! { "_id": id }, EmployeeDocument::new(fields.clone()))
            .await
            .map_err(|e| ServiceError::db("update", e))?;
        Ok(res.matched_count)
    }

    async fn delete_one(&self, id: ObjectId) -> Result<u64, ServiceError> {
        let res = self
            .collection
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| ServiceError::db("delete", e))?;
        Ok(res.deleted_count)
    }
}
