use std::sync::Arc;

use crate::auth::resolver::SessionResolver;
use crate::auth::session::SessionManager;
use crate::auth::token::{TokenCodec, TokenError};
use crate::config::auth::AuthConfig;
use crate::config::csrf::CsrfConfig;
use crate::observe::EventRecorder;
use crate::session::cookie::SessionCookiePolicy;
use crate::ticket::service::TicketService;
use crate::ticket::store::{InMemoryTicketStore, TicketStore};
use crate::time::clock::Clock;
use crate::user::service::UserService;
use crate::user::store::{InMemoryUserStore, UserStore};

/// Persistence backends chosen at startup.
#[derive(Clone)]
pub struct Stores {
    pub tickets: Arc<dyn TicketStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: Arc::new(InMemoryTicketStore::new(clock.clone())),
            users: Arc::new(InMemoryUserStore::new(clock)),
        }
    }
}

/// Shared handler state. Cloning is cheap; every field is reference-counted
/// or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub resolver: SessionResolver,
    pub users: UserService,
    pub tickets: TicketService,
    pub csrf: Arc<CsrfConfig>,
    pub cookie_policy: SessionCookiePolicy,
    pub recorder: Arc<dyn EventRecorder>,
}

impl AppState {
    /// Wires the token codec, session services and ticket service together.
    ///
    /// Fails only when the auth secret is unusable.
    pub fn new(
        auth: &AuthConfig,
        csrf: CsrfConfig,
        stores: Stores,
        clock: Arc<dyn Clock>,
        recorder: Arc<dyn EventRecorder>,
    ) -> Result<Self, TokenError> {
        let codec = Arc::new(TokenCodec::new(auth.secret(), clock)?);
        let sessions = SessionManager::new(codec.clone(), recorder.clone());

        Ok(Self {
            resolver: SessionResolver::new(codec, recorder.clone()),
            users: UserService::new(stores.users, sessions, recorder.clone()),
            tickets: TicketService::new(stores.tickets, recorder.clone()),
            csrf: Arc::new(csrf),
            cookie_policy: auth.cookie_policy(),
            recorder,
        })
    }
}
