use async_trait::async_trait;
use models::employee::{EmployeeDocument, EmployeeFields};
use models::ObjectId;

use crate::errors::ServiceError;

/// Document-store capabilities the employee service relies on.
///
/// Implementations must be safe to share between concurrent requests.
/// Counts are reported as the store returns them; interpreting zero as
/// "not found" is up to the caller.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert a new document and return the identifier the store assigned.
    async fn insert(&self, fields: &EmployeeFields) -> Result<ObjectId, ServiceError>;
    async fn find_one(&self, id: ObjectId) -> Result<Option<EmployeeDocument>, ServiceError>;
    /// Every document in natural store order.
    async fn find_all(&self) -> Result<Vec<EmployeeDocument>, ServiceError>;
    /// Replace all non-id fields; returns the matched count.
    async fn replace_one(&self, id: ObjectId, fields: &EmployeeFields) -> Result<u64, ServiceError>;
    /// Returns the deleted count.
    async fn delete_one(&self, id: ObjectId) -> Result<u64, ServiceError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockEmployeeStore {
        docs: Mutex<Vec<(ObjectId, EmployeeFields)>>, // insertion order = natural order
        failure: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    impl MockEmployeeStore {
        /// A store whose every call fails with `message`, like a lost connection.
        pub fn failing(message: &str) -> Self {
            let store = Self::default();
            store.fail_with(Some(message));
            store
        }

        pub fn fail_with(&self, message: Option<&str>) {
            if let Ok(mut failure) = self.failure.lock() {
                *failure = message.map(str::to_string);
            }
        }

        /// Number of store operations issued so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.docs.lock().map(|d| d.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn enter(&self, op: &str) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failure = self
                .failure
                .lock()
                .map_err(|_| ServiceError::db(op, "mock store lock poisoned"))?;
            match failure.as_deref() {
                Some(message) => Err(ServiceError::db(op, message)),
                None => Ok(()),
            }
        }

        fn docs(&self, op: &str) -> Result<std::sync::MutexGuard<'_, Vec<(ObjectId, EmployeeFields)>>, ServiceError> {
            self.docs.lock().map_err(|_| ServiceError::db(op, "mock store lock poisoned"))
        }
    }

    #[async_trait]
    impl EmployeeStore for MockEmployeeStore {
        async fn insert(&self, fields: &EmployeeFields) -> Result<ObjectId, ServiceError> {
            self.enter("create")?;
            let id = ObjectId::new();
            self.docs("create")?.push((id, fields.clone()));
            Ok(id)
        }

        async fn find_one(&self, id: ObjectId) -> Result<Option<EmployeeDocument>, ServiceError> {
            self.enter("find")?;
            let docs = self.docs("find")?;
            Ok(docs
                .iter()
                .find(|(doc_id, _)| *doc_id == id)
                .map(|(doc_id, fields)| EmployeeDocument { id: Some(*doc_id), fields: fields.clone() }))
        }

        async fn find_all(&self) -> Result<Vec<EmployeeDocument>, ServiceError> {
            self.enter("retrieve")?;
            let docs = self.docs("retrieve")?;
            Ok(docs
                .iter()
                .map(|(id, fields)| EmployeeDocument { id: Some(*id), fields: fields.clone() })
                .collect())
        }

        async fn replace_one(&self, id: ObjectId, fields: &EmployeeFields) -> Result<u64, ServiceError> {
            self.enter("update")?;
            let mut docs = self.docs("update")?;
            match docs.iter_mut().find(|(doc_id, _)| *doc_id == id) {
                Some((_, stored)) => {
                    *stored = fields.clone();
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete_one(&self, id: ObjectId) -> Result<u64, ServiceError> {
            self.enter("delete")?;
            let mut docs = self.docs("delete")?;
            let before = docs.len();
            docs.retain(|(doc_id, _)| *doc_id != id);
            Ok((before - docs.len()) as u64)
        }
    }
}
