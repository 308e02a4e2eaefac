use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::response::DispatchResponse;
use crate::app::App;
use crate::jobs::pipeline::apply_action;
use crate::jobs::JobAction;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobAgentParams {
    pub id: String,
    pub action: String,
}

/// `GET /recurring-jobs/agent` — start, stop or remove a job by id.
pub async fn job_agent(
    State(app): State<App>,
    Query(params): Query<JobAgentParams>,
) -> Json<DispatchResponse> {
    let Ok(action) = JobAction::from_str(&params.action) else {
        return Json(DispatchResponse::failure(format!(
            "Unknown action '{}', expected start, stop or remove",
            params.action
        )));
    };

    match apply_action(&app.registry, &params.id, action).await {
        Ok(()) => Json(DispatchResponse::ok()),
        Err(e) => Json(DispatchResponse::from(&e)),
    }
}
