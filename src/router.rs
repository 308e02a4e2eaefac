use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{api, app::App};

pub fn router(app: App) -> Router {
    Router::new()
        .route("/liveness", get(api::health_checks::ok))
        .route("/readiness", get(api::health_checks::ok))
        .route("/recurring-jobs", get(api::listing::list_jobs))
        .route("/recurring-jobs/stopped", get(api::listing::list_stopped))
        .route("/recurring-jobs/update", get(api::save_job::update_job))
        .route("/recurring-jobs/agent", get(api::job_agent::job_agent))
        .route("/recurring-jobs/rescan", post(api::rescan::rescan))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}
