use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::action::ActionResult;

/// Router fallback: `404` with an `ActionResult` body.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ActionResult::failure("Not found")),
    )
        .into_response()
}
