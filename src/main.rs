use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use ticket_desk::config::{AppConfig, create_pool};
use ticket_desk::db::{Db, MySqlDb};
use ticket_desk::observe::{EventRecorder, TracingRecorder};
use ticket_desk::ticket::SqlTicketStore;
use ticket_desk::time::{Clock, SystemClock};
use ticket_desk::user::SqlUserStore;
use ticket_desk::web::{AppState, Stores, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads dotenv first so RUST_LOG from the file takes effect.
    let cfg = AppConfig::from_env().context("invalid configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    info!(
        app_env = %cfg.app_env,
        secret_fingerprint = %cfg.auth.fingerprint(),
        cookie_secure = cfg.auth.cookie_secure,
        "ticket-desk starting"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let recorder: Arc<dyn EventRecorder> = Arc::new(TracingRecorder);

    let stores = if cfg.db.is_configured() {
        let pool = create_pool(&cfg.db)?;
        let db: Arc<dyn Db> = Arc::new(MySqlDb::new(pool));
        info!("using MySQL stores");
        Stores {
            tickets: Arc::new(SqlTicketStore::new(db.clone(), clock.clone())),
            users: Arc::new(SqlUserStore::new(db, clock.clone())),
        }
    } else {
        info!("DATABASE_URL not set; using in-memory stores");
        Stores::in_memory(clock.clone())
    };

    let state = AppState::new(&cfg.auth, cfg.csrf.clone(), stores, clock, recorder)
        .context("failed to initialise session tokens")?;
    let app = router(state, cfg.http.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(cfg.http.bind_addr).await?;
    info!(addr = %cfg.http.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
