use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::web::account::{login, logout, register};
use crate::web::csrf::{csrf_handler, require_csrf};
use crate::web::fallback::not_found;
use crate::web::state::AppState;
use crate::web::tickets::{close_ticket, create_ticket, list_tickets, view_ticket};

/// Builds the HTTP surface.
///
/// Every `POST` route passes the CSRF double-submit check before its handler.
/// Unknown paths fall through to a JSON `404`.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    let csrf = middleware::from_fn_with_state(state.clone(), require_csrf);

    Router::new()
        .route("/csrf", get(csrf_handler))
        .route("/register", post(register).route_layer(csrf.clone()))
        .route("/login", post(login).route_layer(csrf.clone()))
        .route("/logout", post(logout).route_layer(csrf.clone()))
        .route(
            "/tickets",
            get(list_tickets).merge(post(create_ticket).route_layer(csrf.clone())),
        )
        .route("/tickets/{id}", get(view_ticket))
        .route("/tickets/{id}/close", post(close_ticket).route_layer(csrf))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum_extra::extract::cookie::{Cookie, SameSite};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::auth::AuthConfig;
    use crate::config::csrf::{CsrfConfig, derive_secret_from_string};
    use crate::observe::MemoryRecorder;
    use crate::session::cookie::SESSION_COOKIE_NAME;
    use crate::time::clock::FixedClock;
    use crate::web::csrf::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME};
    use crate::web::state::Stores;

    fn app() -> (Router, Arc<MemoryRecorder>) {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let recorder = Arc::new(MemoryRecorder::default());
        let csrf = CsrfConfig {
            secret: derive_secret_from_string("router-csrf"),
            cookie_secure: false,
            cookie_http_only: true,
        };
        let state = AppState::new(
            &AuthConfig::new("router-auth-secret", false),
            csrf,
            Stores::in_memory(clock.clone()),
            clock,
            recorder.clone(),
        )
        .unwrap();
        (router(state, 64 * 1024), recorder)
    }

    /// A cookie-keeping test client.
    struct Client {
        app: Router,
        cookies: HashMap<String, String>,
        csrf: Option<String>,
        last_set_cookies: Vec<Cookie<'static>>,
    }

    impl Client {
        fn new(app: Router) -> Self {
            Self {
                app,
                cookies: HashMap::new(),
                csrf: None,
                last_set_cookies: Vec::new(),
            }
        }

        async fn fetch_csrf(&mut self) {
            let (status, body) = self.send(Method::GET, "/csrf", None).await;
            assert_eq!(status, StatusCode::OK);
            self.csrf = body["csrfToken"].as_str().map(String::from);
        }

        async fn send(
            &mut self,
            method: Method,
            uri: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut req = Request::builder().method(method).uri(uri);
            if !self.cookies.is_empty() {
                let cookie_header = self
                    .cookies
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                req = req.header(header::COOKIE, cookie_header);
            }
            if let Some(token) = &self.csrf {
                req = req.header(CSRF_HEADER_NAME, token);
            }
            let req = match body {
                Some(v) => req
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(v.to_string())),
                None => req.body(Body::empty()),
            }
            .unwrap();

            let resp = self.app.clone().oneshot(req).await.unwrap();
            let status = resp.status();

            self.last_set_cookies = resp
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .filter_map(|s| Cookie::parse(s.to_string()).ok())
                .collect();
            for c in &self.last_set_cookies {
                let removed = c.value().is_empty()
                    || c.max_age() == Some(cookie::time::Duration::ZERO);
                if removed {
                    self.cookies.remove(c.name());
                } else {
                    self.cookies.insert(c.name().to_string(), c.value().to_string());
                }
            }

            let bytes = resp.into_body().collect().await.unwrap().to_bytes();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn register(&mut self, name: &str, email: &str) -> (StatusCode, Value) {
            self.send(
                Method::POST,
                "/register",
                Some(json!({ "name": name, "email": email, "password": "secret1" })),
            )
            .await
        }

        async fn create_ticket(&mut self, subject: &str) -> (StatusCode, Value) {
            self.send(
                Method::POST,
                "/tickets",
                Some(json!({ "subject": subject, "description": "details", "priority": "High" })),
            )
            .await
        }
    }

    async fn signed_in(app: &Router, name: &str) -> Client {
        let mut client = Client::new(app.clone());
        client.fetch_csrf().await;
        let (status, _) = client
            .register(name, &format!("{name}@example.com"))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        client
    }

    #[tokio::test]
    async fn csrf_endpoint_sets_cookie_and_returns_token() {
        let (app, _) = app();
        let mut client = Client::new(app);

        client.fetch_csrf().await;

        let token = client.csrf.clone().unwrap();
        assert!(token.starts_with("v1."));
        assert_eq!(client.cookies.get(CSRF_COOKIE_NAME), Some(&token));
    }

    #[tokio::test]
    async fn mutating_routes_require_csrf() {
        let (app, recorder) = app();
        let mut client = Client::new(app);

        let (status, body) = client.register("ada", "ada@example.com").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
        assert_eq!(recorder.in_category("csrf").len(), 1);
        assert!(client.cookies.get(SESSION_COOKIE_NAME).is_none());
    }

    #[tokio::test]
    async fn register_sets_session_cookie_attributes() {
        let (app, _) = app();
        let mut client = Client::new(app);
        client.fetch_csrf().await;

        let (status, body) = client.register("ada", "ada@example.com").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["user"].get("passwordHash").is_none());

        let session = client
            .last_set_cookies
            .iter()
            .find(|c| c.name() == SESSION_COOKIE_NAME)
            .expect("session cookie");
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.same_site(), Some(SameSite::Lax));
        assert_eq!(session.path(), Some("/"));
        assert_eq!(
            session.max_age(),
            Some(cookie::time::Duration::seconds(604_800))
        );
    }

    #[tokio::test]
    async fn anonymous_callers() {
        let (app, _) = app();
        let mut client = Client::new(app);
        client.fetch_csrf().await;

        let (status, body) = client.send(Method::GET, "/tickets", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tickets"], json!([]));

        let (status, _) = client.create_ticket("nope").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let uri = format!("/tickets/{}", uuid::Uuid::now_v7());
        let (status, _) = client.send(Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = client.send(Method::GET, "/tickets/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ticket_lifecycle_is_owner_scoped() {
        let (app, _) = app();
        let mut alice = signed_in(&app, "alice").await;
        let mut bob = signed_in(&app, "bob").await;

        let (status, body) = alice.create_ticket("Printer on fire").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Ticket created successfully!");
        let id = body["ticket"]["id"].as_str().unwrap().to_string();

        let (_, listed) = alice.send(Method::GET, "/tickets", None).await;
        assert_eq!(listed["tickets"].as_array().unwrap().len(), 1);
        let (_, listed) = bob.send(Method::GET, "/tickets", None).await;
        assert_eq!(listed["tickets"], json!([]));

        let view = format!("/tickets/{id}");
        let (status, body) = alice.send(Method::GET, &view, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticket"]["subject"], "Printer on fire");
        let (status, _) = bob.send(Method::GET, &view, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let close = format!("/tickets/{id}/close");
        let (status, _) = bob.send(Method::POST, &close, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, body) = alice.send(Method::POST, &close, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticket"]["status"], "Closed");
        let (status, _) = alice.send(Method::POST, &close, None).await;
        assert_eq!(status, StatusCode::OK);

        let missing = format!("/tickets/{}", uuid::Uuid::now_v7());
        let (status, _) = alice.send(Method::GET, &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_ticket_fields_are_unprocessable() {
        let (app, _) = app();
        let mut alice = signed_in(&app, "alice").await;

        let (status, body) = alice
            .send(
                Method::POST,
                "/tickets",
                Some(json!({ "subject": "s", "description": "d", "priority": "urgent" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Invalid priority");

        let (status, body) = alice.send(Method::POST, "/tickets", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "All fields are required");
    }

    #[tokio::test]
    async fn login_logout_round() {
        let (app, _) = app();
        let mut ada = signed_in(&app, "ada").await;

        let (status, _) = ada.send(Method::POST, "/logout", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(ada.cookies.get(SESSION_COOKIE_NAME).is_none());
        let (status, _) = ada.create_ticket("after logout").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = ada
            .send(
                Method::POST,
                "/login",
                Some(json!({ "email": "ada@example.com", "password": "wrong-pass" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = ada
            .send(
                Method::POST,
                "/login",
                Some(json!({ "email": "ADA@example.com", "password": "secret1" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = ada.create_ticket("after login").await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn tampered_session_cookie_is_anonymous() {
        let (app, recorder) = app();
        let mut ada = signed_in(&app, "ada").await;
        let token = ada.cookies.get(SESSION_COOKIE_NAME).unwrap().clone();
        let mut forged = token.into_bytes();
        let last = forged.len() - 1;
        forged[last] = if forged[last] == b'A' { b'B' } else { b'A' };
        ada.cookies.insert(
            SESSION_COOKIE_NAME.to_string(),
            String::from_utf8(forged).unwrap(),
        );

        let (status, body) = ada.send(Method::GET, "/tickets", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tickets"], json!([]));
        assert!(
            recorder
                .events()
                .iter()
                .any(|e| e.message == "Token verification failed")
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (app, _) = app();
        let mut client = Client::new(app);

        let (status, body) = client.send(Method::GET, "/nowhere", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let (app, _) = app();
        let mut alice = signed_in(&app, "alice").await;
        let huge = "x".repeat(128 * 1024);

        let (status, _) = alice.create_ticket(&huge).await;

        assert_ne!(status, StatusCode::CREATED);
    }
}
