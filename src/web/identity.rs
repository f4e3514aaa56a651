use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::auth::principal::Identity;
use crate::session::cookie::CookieSessionStore;
use crate::web::state::AppState;

/// Extracts the caller's [`Identity`] from the session cookie.
///
/// Never rejects: a missing or invalid session yields
/// [`Identity::Anonymous`] and the handler decides what that means.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentIdentity(pub Identity);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let store = CookieSessionStore::new(jar, state.cookie_policy);
        Ok(Self(state.resolver.resolve(&store)))
    }
}
