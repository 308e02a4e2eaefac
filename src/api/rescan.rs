use axum::{extract::State, Json};

use crate::api::response::DispatchResponse;
use crate::app::App;

/// `POST /recurring-jobs/rescan` — explicit catalog rebuild.
///
/// The replacement is published atomically; requests already holding a
/// snapshot keep resolving against the catalog they started with.
pub async fn rescan(State(app): State<App>) -> Json<DispatchResponse> {
    let catalog = app.catalog.rescan(&app.config.catalog);
    Json(DispatchResponse::ok_with_message(format!(
        "Catalog rebuilt: {} modules, {} types, {} signatures",
        catalog.modules().len(),
        catalog.type_count(),
        catalog.signature_count()
    )))
}
