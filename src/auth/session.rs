use std::sync::Arc;

use serde_json::json;

use crate::auth::principal::SubjectId;
use crate::auth::token::{TokenCodec, TokenError};
use crate::observe::{Event, EventRecorder, Severity};
use crate::session::store::SessionStore;

/// Starts and ends sessions: signs a fresh token into the store on login or
/// registration, and clears it on logout.
///
/// Sessions are never refreshed; a token lives for its fixed 7-day window.
#[derive(Clone)]
pub struct SessionManager {
    codec: Arc<TokenCodec>,
    recorder: Arc<dyn EventRecorder>,
}

impl SessionManager {
    pub fn new(codec: Arc<TokenCodec>, recorder: Arc<dyn EventRecorder>) -> Self {
        Self { codec, recorder }
    }

    /// Issues a token for `subject` and puts it in `store`.
    ///
    /// On a signing failure the store is left untouched.
    pub fn start(
        &self,
        store: &mut dyn SessionStore,
        subject: &SubjectId,
    ) -> Result<(), TokenError> {
        let token = match self.codec.issue(subject.clone()) {
            Ok(token) => token,
            Err(e) => {
                self.recorder.record(
                    Event::new(Severity::Error, "auth", "Token signing failed")
                        .with_context(json!({ "subjectId": subject }))
                        .with_error(&e),
                );
                return Err(e);
            }
        };

        store.put(&token);
        Ok(())
    }

    /// Removes any session token from `store`.
    pub fn end(&self, store: &mut dyn SessionStore) {
        store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::auth::principal::Identity;
    use crate::auth::resolver::SessionResolver;
    use crate::observe::MemoryRecorder;
    use crate::session::store::MemorySessionStore;
    use crate::time::clock::FixedClock;

    fn parts() -> (SessionManager, SessionResolver) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 2, 2, 2, 2, 2).unwrap(),
        ));
        let codec = Arc::new(TokenCodec::new(b"session-secret", clock).unwrap());
        let recorder = Arc::new(MemoryRecorder::default());
        (
            SessionManager::new(codec.clone(), recorder.clone()),
            SessionResolver::new(codec, recorder),
        )
    }

    #[test]
    fn start_puts_a_token_the_resolver_accepts() {
        let (sessions, resolver) = parts();
        let mut store = MemorySessionStore::default();

        sessions.start(&mut store, &SubjectId::new("alice")).unwrap();

        assert!(store.get().is_some());
        assert_eq!(resolver.resolve(&store), Identity::authenticated("alice"));
    }

    #[test]
    fn start_replaces_previous_session() {
        let (sessions, resolver) = parts();
        let mut store = MemorySessionStore::default();

        sessions.start(&mut store, &SubjectId::new("alice")).unwrap();
        sessions.start(&mut store, &SubjectId::new("bob")).unwrap();

        assert_eq!(resolver.resolve(&store), Identity::authenticated("bob"));
    }

    #[test]
    fn end_clears_and_is_idempotent() {
        let (sessions, resolver) = parts();
        let mut store = MemorySessionStore::default();
        sessions.start(&mut store, &SubjectId::new("alice")).unwrap();

        sessions.end(&mut store);
        sessions.end(&mut store);

        assert_eq!(store.get(), None);
        assert_eq!(resolver.resolve(&store), Identity::Anonymous);
    }
}
