use axum::{
    extract::{Query, State},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use validator::Validate;

use crate::api::response::DispatchResponse;
use crate::app::App;
use crate::jobs::pipeline::{save_job, JobDescriptor};

/// Save request query parameters. `Arguments` and `ArgumentsTypes` carry
/// JSON array text; blanks mean "no arguments".
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct SaveJobParams {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub cron: String,
    #[serde(default)]
    pub time_zone_id: String,
    #[serde(rename = "Class")]
    #[validate(length(min = 1))]
    pub class_name: String,
    #[serde(rename = "Method")]
    #[validate(length(min = 1))]
    pub method_name: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub arguments_types: String,
    #[serde(default)]
    pub queue: String,
}

/// `GET /recurring-jobs/update` — the save pipeline entry point.
pub async fn update_job(
    State(app): State<App>,
    Query(params): Query<SaveJobParams>,
) -> Json<DispatchResponse> {
    if let Err(errors) = params.validate() {
        return Json(DispatchResponse::failures(&errors));
    }

    let argument_values: Vec<Value> = match parse_json_list(&params.arguments) {
        Ok(values) => values,
        Err(e) => {
            debug!(error = %e, "rejecting save request: bad Arguments payload");
            return Json(DispatchResponse::failure(
                "Arguments is not a valid JSON array",
            ));
        }
    };
    let argument_type_names: Vec<String> = match parse_json_list(&params.arguments_types) {
        Ok(names) => names,
        Err(e) => {
            debug!(error = %e, "rejecting save request: bad ArgumentsTypes payload");
            return Json(DispatchResponse::failure(
                "ArgumentsTypes is not a valid JSON array",
            ));
        }
    };

    let queue = if params.queue.trim().is_empty() {
        app.config.jobs.default_queue.clone()
    } else {
        params.queue
    };

    let descriptor = JobDescriptor {
        id: params.id,
        cron: params.cron,
        time_zone_id: params.time_zone_id,
        type_name: params.class_name,
        method_name: params.method_name,
        argument_type_names,
        argument_values,
        queue,
    };

    let catalog = app.catalog.current();
    match save_job(&catalog, &app.decoders, &app.registry, descriptor).await {
        Ok(_) => Json(DispatchResponse::ok()),
        Err(e) => Json(DispatchResponse::from(&e)),
    }
}

fn parse_json_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, serde_json::Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}
