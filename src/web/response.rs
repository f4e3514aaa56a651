//! JSON response shapes and the status mapping for [`ActionError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::action::{ActionError, ActionResult};

pub fn status_for(err: &ActionError) -> StatusCode {
    match err {
        ActionError::Unauthenticated | ActionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ActionError::Forbidden => StatusCode::FORBIDDEN,
        ActionError::NotFound => StatusCode::NOT_FOUND,
        ActionError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ActionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A failed action rendered as `{ success: false, message }`.
///
/// `fallback` is the message shown for storage failures.
pub struct ActionFailure {
    pub error: ActionError,
    pub fallback: &'static str,
}

impl ActionFailure {
    pub fn new(error: ActionError, fallback: &'static str) -> Self {
        Self { error, fallback }
    }
}

impl IntoResponse for ActionFailure {
    fn into_response(self) -> Response {
        (
            status_for(&self.error),
            Json(ActionResult::from_error(&self.error, self.fallback)),
        )
            .into_response()
    }
}

/// `{ success: true, message, <key>: payload }`.
pub fn success<T: Serialize>(
    status: StatusCode,
    message: &str,
    key: &str,
    payload: &T,
) -> Response {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert("message".into(), Value::String(message.into()));
    body.insert(key.into(), json!(payload));
    (status, Json(Value::Object(body))).into_response()
}
