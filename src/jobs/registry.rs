//! Owner of the recurring-job lifecycle state machine.
//!
//! States per id: `Unregistered → Active ⇄ Stopped → Removed`. `Removed` is
//! terminal and frees the id. Registration is create-or-replace and never
//! changes the current Active/Stopped state of an existing job.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::signature::MethodSignature;
use crate::error::AdminError;
use crate::jobs::store::JobStore;
use crate::jobs::{JobAction, JobState, RegisteredJob};

/// Fully resolved registration input: the save pipeline's final product.
#[derive(Debug, Clone)]
pub struct JobRegistration {
    pub id: String,
    pub signature: MethodSignature,
    pub arguments: Vec<Value>,
    pub cron: String,
    pub time_zone_id: String,
    pub queue: String,
}

#[derive(Clone)]
pub struct RecurringJobRegistry {
    store: Arc<dyn JobStore>,
}

impl RecurringJobRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Create-or-replace a registration.
    ///
    /// A new id starts `Active`. An existing id has its schedule, queue,
    /// method and arguments overwritten in place; its current state,
    /// creation time and last-execution info are preserved — a stopped job
    /// stays stopped until explicitly started.
    pub async fn register(
        &self,
        registration: JobRegistration,
    ) -> Result<RegisteredJob, AdminError> {
        let existing = self.store.get(&registration.id).await?;
        let (state, created_at, last_execution) = match &existing {
            Some(current) => (current.state, current.created_at, current.last_execution),
            None => (JobState::Active, Utc::now(), None),
        };

        let job = RegisteredJob {
            id: registration.id,
            cron: registration.cron,
            time_zone_id: registration.time_zone_id,
            queue: registration.queue,
            signature: registration.signature,
            arguments: registration.arguments,
            state,
            created_at,
            last_execution,
        };
        self.store.upsert(job.clone()).await?;

        info!(
            id = %job.id,
            cron = %job.cron,
            queue = %job.queue,
            replaced = existing.is_some(),
            "recurring job registered"
        );
        Ok(job)
    }

    /// `Stopped → Active`; idempotent when already `Active`.
    pub async fn activate(&self, id: &str) -> Result<(), AdminError> {
        self.transition(id, JobState::Active, JobAction::Start).await
    }

    /// `Active → Stopped`; idempotent when already `Stopped`.
    pub async fn deactivate(&self, id: &str) -> Result<(), AdminError> {
        self.transition(id, JobState::Stopped, JobAction::Stop).await
    }

    /// Delete the registration from any live state. The id becomes free.
    pub async fn remove(&self, id: &str) -> Result<(), AdminError> {
        if self.store.get(id).await?.is_none() {
            return Err(AdminError::StateTransitionInvalid {
                id: id.to_string(),
                from: JobState::Unregistered,
                action: JobAction::Remove,
            });
        }
        self.store.delete(id).await?;
        info!(id, "recurring job removed");
        Ok(())
    }

    async fn transition(
        &self,
        id: &str,
        target: JobState,
        action: JobAction,
    ) -> Result<(), AdminError> {
        let Some(mut job) = self.store.get(id).await? else {
            return Err(AdminError::StateTransitionInvalid {
                id: id.to_string(),
                from: JobState::Unregistered,
                action,
            });
        };

        if job.state == target {
            debug!(id, state = %target, "job already in target state");
            return Ok(());
        }

        job.state = target;
        self.store.upsert(job).await?;
        info!(id, state = %target, "recurring job state changed");
        Ok(())
    }

    pub async fn list_active(
        &self,
        from: usize,
        count: usize,
    ) -> Result<Vec<RegisteredJob>, AdminError> {
        Ok(page(self.store.list(JobState::Active).await?, from, count))
    }

    pub async fn list_stopped(
        &self,
        from: usize,
        count: usize,
    ) -> Result<Vec<RegisteredJob>, AdminError> {
        Ok(page(self.store.list(JobState::Stopped).await?, from, count))
    }

    /// Combined dashboard view: active jobs first in store order, then
    /// stopped jobs, with one continuous page window across the boundary.
    pub async fn list_all(
        &self,
        from: usize,
        count: usize,
    ) -> Result<Vec<RegisteredJob>, AdminError> {
        let mut combined = self.store.list(JobState::Active).await?;
        combined.extend(self.store.list(JobState::Stopped).await?);
        Ok(page(combined, from, count))
    }

    /// `(active, stopped)` totals for pager rendering.
    pub async fn counts(&self) -> Result<(usize, usize), AdminError> {
        Ok((
            self.store.count(JobState::Active).await?,
            self.store.count(JobState::Stopped).await?,
        ))
    }
}

fn page(jobs: Vec<RegisteredJob>, from: usize, count: usize) -> Vec<RegisteredJob> {
    jobs.into_iter().skip(from).take(count).collect()
}
