use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::errors::ServiceError;

/// Point in time by which a store call has to finish.
///
/// Elapsing drops the in-flight store future, which aborts the driver operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn after(timeout: Duration) -> Self {
        Self(Some(Instant::now() + timeout))
    }

    /// Caller-supplied timeout capped by a server-side maximum.
    pub fn from_timeouts(requested: Option<Duration>, max: Option<Duration>) -> Self {
        match (requested, max) {
            (Some(a), Some(b)) => Self::after(a.min(b)),
            (Some(t), None) | (None, Some(t)) => Self::after(t),
            (None, None) => Self::none(),
        }
    }

    pub async fn run<T, F>(self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        match self.0 {
            None => fut.await,
            Some(at) => tokio::time::timeout_at(at, fut)
                .await
                .map_err(|_| ServiceError::DeadlineExceeded)?,
        }
    }
}
