use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::App;
use crate::error::AdminError;
use crate::jobs::RegisteredJob;
use crate::schedule::next_execution;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub from: usize,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    50
}

/// One row of the dashboard read model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PeriodicJobView {
    pub id: String,
    pub cron: String,
    pub time_zone_id: String,
    #[serde(rename = "Class")]
    pub class_name: String,
    #[serde(rename = "Method")]
    pub method_name: String,
    pub arguments: Vec<Value>,
    pub arguments_types: Vec<String>,
    pub queue: String,
    pub job_state: String,
    pub created_at: DateTime<Utc>,
    pub next_execution: Option<DateTime<Utc>>,
    pub last_execution: Option<DateTime<Utc>>,
}

impl From<&RegisteredJob> for PeriodicJobView {
    fn from(job: &RegisteredJob) -> Self {
        Self {
            id: job.id.clone(),
            cron: job.cron.clone(),
            time_zone_id: job.time_zone_id.clone(),
            class_name: job.signature.declaring_type.clone(),
            method_name: job.signature.name.clone(),
            arguments: job.arguments.clone(),
            arguments_types: job.signature.parameter_type_names(),
            queue: job.queue.clone(),
            job_state: job.state.to_string(),
            created_at: job.created_at,
            next_execution: next_execution(&job.cron, &job.time_zone_id),
            last_execution: job.last_execution,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListingResponse {
    pub total: usize,
    pub jobs: Vec<PeriodicJobView>,
}

/// `GET /recurring-jobs` — combined paginated view, active first, then
/// stopped, one continuous page window across the boundary.
pub async fn list_jobs(
    State(app): State<App>,
    Query(page): Query<PageParams>,
) -> Result<Json<ListingResponse>, AdminError> {
    let (active, stopped) = app.registry.counts().await?;
    let jobs = app.registry.list_all(page.from, page.count).await?;
    Ok(Json(ListingResponse {
        total: active + stopped,
        jobs: jobs.iter().map(PeriodicJobView::from).collect(),
    }))
}

/// `GET /recurring-jobs/stopped` — stopped jobs only.
pub async fn list_stopped(
    State(app): State<App>,
    Query(page): Query<PageParams>,
) -> Result<Json<ListingResponse>, AdminError> {
    let (_, stopped) = app.registry.counts().await?;
    let jobs = app.registry.list_stopped(page.from, page.count).await?;
    Ok(Json(ListingResponse {
        total: stopped,
        jobs: jobs.iter().map(PeriodicJobView::from).collect(),
    }))
}
