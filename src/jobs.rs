//! Recurring-job lifecycle: registration, state machine and persistence seam.

pub mod pipeline;
pub mod registry;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::catalog::signature::MethodSignature;

/// Lifecycle state of a job id.
///
/// `Unregistered` is never persisted; it names the source state of a failed
/// transition on an id the store does not know. Removal deletes the record
/// outright, freeing the id for reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum JobState {
    Unregistered,
    Active,
    Stopped,
}

/// Administrative action on a registered job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum JobAction {
    Start,
    Stop,
    Remove,
}

/// A recurring job as persisted by the job store.
///
/// Replace-semantics on re-registration: schedule, queue, method and
/// arguments are overwritten whole; `state`, `created_at` and
/// `last_execution` survive the replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredJob {
    pub id: String,
    pub cron: String,
    pub time_zone_id: String,
    pub queue: String,
    pub signature: MethodSignature,
    pub arguments: Vec<Value>,
    pub state: JobState,
    pub created_at: DateTime<Utc>,
    /// Owned by the external execution engine; carried opaquely.
    pub last_execution: Option<DateTime<Utc>>,
}
