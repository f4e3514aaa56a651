use std::sync::Arc;

use serde_json::json;

use crate::auth::principal::Identity;
use crate::auth::token::{TokenCodec, token_excerpt};
use crate::observe::{Event, EventRecorder, Severity};
use crate::session::store::SessionStore;

/// Resolves the session carried by a [`SessionStore`] into an [`Identity`].
///
/// This is the single choke point for authentication. Every verification
/// failure (malformed, tampered, expired) becomes [`Identity::Anonymous`] so
/// that callers cannot tell an invalid session from a missing one.
///
/// Resolution only reads the store; it never refreshes or rewrites the token.
#[derive(Clone)]
pub struct SessionResolver {
    codec: Arc<TokenCodec>,
    recorder: Arc<dyn EventRecorder>,
}

impl SessionResolver {
    pub fn new(codec: Arc<TokenCodec>, recorder: Arc<dyn EventRecorder>) -> Self {
        Self { codec, recorder }
    }

    pub fn resolve(&self, store: &dyn SessionStore) -> Identity {
        let Some(token) = store.get() else {
            return Identity::Anonymous;
        };

        match self.codec.verify(&token) {
            Ok(claims) => Identity::Authenticated {
                subject_id: claims.sub,
            },
            Err(e) => {
                self.recorder.record(
                    Event::new(Severity::Warning, "auth", "Token verification failed")
                        .with_context(json!({
                            "tokenSnippet": token_excerpt(&token),
                            "reason": e.kind(),
                        }))
                        .with_error(&e),
                );
                Identity::Anonymous
            }
        }
    }
}
