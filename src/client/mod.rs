//! Resource client
//!
//! Thin async wrappers over the institute REST backend. Each operation is a
//! single request/response round trip; there are no retries and no batching.
//! Callers decide whether and how to surface a [`ClientError`].

mod error;
#[cfg(test)]
pub(crate) mod mock;
mod rest;
pub mod routes;

pub use error::{ClientError, FailureCause};
pub use rest::RestClient;
pub use routes::{CountShape, Routed, WriteRouted};

use async_trait::async_trait;

use crate::models::{CourseStatusCount, Editable, Entity};

/// One page of a paginated list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    pub limit: u32,
}

/// Read access to an entity collection
#[async_trait]
pub trait ListApi<E: Entity>: Send + Sync {
    /// Fetch records in server order; `None` fetches the unpaged collection
    async fn list(&self, page: Option<Page>) -> Result<Vec<E>, ClientError>;

    async fn count(&self) -> Result<u64, ClientError>;
}

/// Write access to an editable entity collection
#[async_trait]
pub trait CrudApi<E: Editable>: ListApi<E> {
    async fn create(&self, draft: &E::Draft) -> Result<E, ClientError>;

    async fn update(&self, id: &str, draft: &E::Draft) -> Result<E, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// Course-only status operations
#[async_trait]
pub trait CourseStatusApi: Send + Sync {
    /// Flip a course's active flag; returns the server's new state
    async fn toggle_active(&self, id: &str) -> Result<bool, ClientError>;

    async fn status_count(&self) -> Result<CourseStatusCount, ClientError>;
}
