//! `POST /register`, `POST /login`, `POST /logout`.
//!
//! Each handler wraps the request's cookies in a [`CookieSessionStore`] and
//! returns the jar with the response so session changes reach the client.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::action::ActionResult;
use crate::session::cookie::CookieSessionStore;
use crate::user::model::{Credentials, Registration};
use crate::web::response::{ActionFailure, success};
use crate::web::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Registration>, JsonRejection>,
) -> Response {
    // An unreadable body is treated as an empty form.
    let form = body.map(|Json(f)| f).unwrap_or_default();
    let mut session = CookieSessionStore::new(jar, state.cookie_policy);

    let outcome = state.users.register(&mut session, form).await;
    let jar = session.into_jar();
    match outcome {
        Ok(user) => (
            jar,
            success(StatusCode::CREATED, "Registration successful", "user", &user),
        )
            .into_response(),
        Err(e) => (
            jar,
            ActionFailure::new(e, "An error occurred during registration"),
        )
            .into_response(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let credentials = body.map(|Json(c)| c).unwrap_or_default();
    let mut session = CookieSessionStore::new(jar, state.cookie_policy);

    let outcome = state.users.login(&mut session, credentials).await;
    let jar = session.into_jar();
    match outcome {
        Ok(user) => {
            (jar, success(StatusCode::OK, "Login successful", "user", &user)).into_response()
        }
        Err(e) => (jar, ActionFailure::new(e, "An error occurred during login")).into_response(),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ActionResult>) {
    let mut session = CookieSessionStore::new(jar, state.cookie_policy);
    state.users.logout(&mut session);
    (session.into_jar(), Json(ActionResult::ok("Logged out")))
}
