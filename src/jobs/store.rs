//! The persistence seam for registered jobs.
//!
//! The engine relies on the store's per-key consistency guarantee; it does
//! not layer its own locking or concurrency tokens on top. Listing order is
//! the store's native order (creation order for the in-memory store).

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::jobs::{JobState, RegisteredJob};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
}

/// External recurring-job store, keyed by job id.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<RegisteredJob>, StoreError>;

    /// Create-or-replace the record for `job.id`.
    async fn upsert(&self, job: RegisteredJob) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// All jobs in `state`, in the store's native order.
    async fn list(&self, state: JobState) -> Result<Vec<RegisteredJob>, StoreError>;

    async fn count(&self, state: JobState) -> Result<usize, StoreError>;
}

/// In-memory reference store. Creation order is the native listing order and
/// survives replacement, matching how a persistent store keeps row identity
/// across updates.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: DashMap<String, StoredEntry>,
    sequence: AtomicU64,
}

struct StoredEntry {
    order: u64,
    job: RegisteredJob,
}

impl MemoryJobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, id: &str) -> Result<Option<RegisteredJob>, StoreError> {
        Ok(self.jobs.get(id).map(|entry| entry.job.clone()))
    }

    async fn upsert(&self, job: RegisteredJob) -> Result<(), StoreError> {
        let order = self
            .jobs
            .get(&job.id)
            .map(|entry| entry.order)
            .unwrap_or_else(|| self.sequence.fetch_add(1, Ordering::Relaxed));
        self.jobs.insert(job.id.clone(), StoredEntry { order, job });
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.jobs.remove(id);
        Ok(())
    }

    async fn list(&self, state: JobState) -> Result<Vec<RegisteredJob>, StoreError> {
        let mut entries: Vec<(u64, RegisteredJob)> = self
            .jobs
            .iter()
            .filter(|entry| entry.job.state == state)
            .map(|entry| (entry.order, entry.job.clone()))
            .collect();
        entries.sort_by_key(|(order, _)| *order);
        Ok(entries.into_iter().map(|(_, job)| job).collect())
    }

    async fn count(&self, state: JobState) -> Result<usize, StoreError> {
        Ok(self
            .jobs
            .iter()
            .filter(|entry| entry.job.state == state)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::catalog::signature::MethodSignature;

    fn job(id: &str, state: JobState) -> RegisteredJob {
        RegisteredJob {
            id: id.to_string(),
            cron: "*/5 * * * *".to_string(),
            time_zone_id: "UTC".to_string(),
            queue: "default".to_string(),
            signature: MethodSignature {
                declaring_type: "Reports.Runner".to_string(),
                name: "Send".to_string(),
                parameters: Vec::new(),
            },
            arguments: Vec::new(),
            state,
            created_at: Utc::now(),
            last_execution: None,
        }
    }

    #[tokio::test]
    async fn test_listing_preserves_creation_order_across_updates() {
        let store = MemoryJobStore::new();
        store.upsert(job("a", JobState::Active)).await.unwrap();
        store.upsert(job("b", JobState::Active)).await.unwrap();
        store.upsert(job("c", JobState::Active)).await.unwrap();

        // replacing "a" must not move it to the end
        store.upsert(job("a", JobState::Active)).await.unwrap();

        let ids: Vec<String> = store
            .list(JobState::Active)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_delete_frees_the_id() {
        let store = MemoryJobStore::new();
        store.upsert(job("a", JobState::Stopped)).await.unwrap();
        assert_eq!(store.count(JobState::Stopped).await.unwrap(), 1);

        store.delete("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
        assert_eq!(store.count(JobState::Stopped).await.unwrap(), 0);
    }
}
