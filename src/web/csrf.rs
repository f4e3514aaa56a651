//! # CSRF Double-Submit Protection
//!
//! Tokens are HMAC-SHA256 signed with the [`CsrfConfig`] secret:
//!
//! ```text
//! v1.<nonce_b64>.<mac_b64>      (32-byte nonce, 32-byte tag, URL-safe, no padding)
//! ```
//!
//! `GET /csrf` issues a token into the `csrf` cookie and echoes it as JSON.
//! Mutating routes run [`require_csrf`], which accepts a request only when the
//! `X-CSRF-Token` header equals the cookie and the token's MAC verifies.

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::json;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::csrf::CsrfConfig;
use crate::error::action::ActionResult;
use crate::observe::{Event, Severity};
use crate::web::state::AppState;

pub const CSRF_COOKIE_NAME: &str = "csrf";
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

const VERSION: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

fn tag(cfg: &CsrfConfig, nonce: &[u8]) -> Vec<u8> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(&cfg.secret)
        .expect("HMAC accepts keys of any length");
    mac.update(nonce);
    mac.finalize().into_bytes().to_vec()
}

pub fn generate_csrf_token(cfg: &CsrfConfig) -> String {
    let nonce: [u8; 32] = rand::random();
    format!(
        "{VERSION}.{}.{}",
        URL_SAFE_NO_PAD.encode(nonce),
        URL_SAFE_NO_PAD.encode(tag(cfg, &nonce))
    )
}

pub fn verify_token(cfg: &CsrfConfig, token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    let [VERSION, nonce_b64, mac_b64] = parts.as_slice() else {
        return false;
    };

    let (Ok(nonce), Ok(mac)) = (URL_SAFE_NO_PAD.decode(nonce_b64), URL_SAFE_NO_PAD.decode(mac_b64))
    else {
        return false;
    };
    if nonce.len() != 32 || mac.len() != 32 {
        return false;
    }

    tag(cfg, &nonce).as_slice().ct_eq(mac.as_slice()).into()
}

/// Why a request failed the double-submit check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrfFailure {
    MissingHeader,
    MissingCookie,
    Mismatch,
    BadSignature,
}

impl CsrfFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MissingCookie => "missing_cookie",
            Self::Mismatch => "mismatch",
            Self::BadSignature => "bad_signature",
        }
    }
}

pub fn check_double_submit(
    headers: &HeaderMap,
    jar: &CookieJar,
    cfg: &CsrfConfig,
) -> Result<(), CsrfFailure> {
    let header = headers
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .ok_or(CsrfFailure::MissingHeader)?;
    let cookie = jar
        .get(CSRF_COOKIE_NAME)
        .map(|c| c.value())
        .filter(|s| !s.is_empty())
        .ok_or(CsrfFailure::MissingCookie)?;

    if !bool::from(header.as_bytes().ct_eq(cookie.as_bytes())) {
        return Err(CsrfFailure::Mismatch);
    }
    if !verify_token(cfg, cookie) {
        return Err(CsrfFailure::BadSignature);
    }
    Ok(())
}

pub fn csrf_cookie(cfg: &CsrfConfig, token: &str) -> Cookie<'static> {
    Cookie::build((CSRF_COOKIE_NAME, token.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(cfg.cookie_secure)
        .http_only(cfg.cookie_http_only)
        .build()
}

#[derive(Debug, Serialize)]
pub struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// `GET /csrf`: reuses a valid cookie token or issues a fresh one.
pub async fn csrf_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, [(axum::http::HeaderName, HeaderValue); 1], Json<CsrfResponse>) {
    let cfg = state.csrf.as_ref();
    let token = jar
        .get(CSRF_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|t| verify_token(cfg, t))
        .unwrap_or_else(|| generate_csrf_token(cfg));

    (
        jar.add(csrf_cookie(cfg, &token)),
        [(CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        Json(CsrfResponse { csrf_token: token }),
    )
}

/// Middleware for state-changing routes. Rejects with `403` before the
/// handler runs.
pub async fn require_csrf(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    match check_double_submit(request.headers(), &jar, &state.csrf) {
        Ok(()) => next.run(request).await,
        Err(failure) => {
            state.recorder.record(
                Event::new(Severity::Warning, "csrf", "CSRF check failed").with_context(json!({
                    "method": request.method().as_str(),
                    "path": request.uri().path(),
                    "reason": failure.as_str(),
                })),
            );
            (
                StatusCode::FORBIDDEN,
                Json(ActionResult::failure("Invalid CSRF token")),
            )
                .into_response()
        }
    }
}
