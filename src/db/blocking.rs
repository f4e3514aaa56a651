use std::sync::Arc;

use anyhow::{Context, Result};

use crate::db::port::Db;

/// Runs a synchronous [`Db`] call on Tokio's blocking pool.
///
/// The async stores use this so that driver I/O never stalls a runtime
/// worker thread.
pub async fn run_blocking<T, F>(db: &Arc<dyn Db>, f: F) -> Result<T>
where
    F: FnOnce(&dyn Db) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || f(db.as_ref()))
        .await
        .context("database task did not complete")?
}
