use journey_core::change::Change;
use journey_core::config::GenerateConfig;
use journey_core::mutation::Mutation;
use journey_core::Store;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use tokio::sync::broadcast;

use crate::error::AppError;

const WATCH_INTERVAL: Duration = Duration::from_millis(800);
/// Filesystem timestamps can be coarse, so two writes in the same tick share
/// an mtime. Entries touched this recently are re-read even when unchanged.
const MTIME_SETTLE: Duration = Duration::from_secs(2);

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    /// Every change applied through the API or picked up by the watcher.
    pub event_tx: broadcast::Sender<Change>,
    pub http_client: reqwest::Client,
    pub generate: GenerateConfig,
}

fn lock(store: &Mutex<Store>) -> anyhow::Result<MutexGuard<'_, Store>> {
    store
        .lock()
        .map_err(|_| anyhow::anyhow!("journey store lock poisoned"))
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let (tx, _) = broadcast::channel(256);
        let generate = store.config().generate.clone();
        let last_seen = store.modified();
        let state = Self {
            store: Arc::new(Mutex::new(store)),
            event_tx: tx,
            http_client: reqwest::Client::new(),
            generate,
        };

        // Poll the backend for writes made by other processes (the CLI, a
        // second server) and stream the differences as change events.
        // Only spawn inside a Tokio runtime; sync unit tests have none.
        if tokio::runtime::Handle::try_current().is_ok() {
            tokio::spawn(watch(state.store.clone(), state.event_tx.clone(), last_seen));
        }

        state
    }

    /// Run a read against the store on the blocking pool.
    pub async fn read<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Store) -> journey_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || {
            let guard = lock(&store)?;
            Ok::<_, anyhow::Error>(f(&guard)?)
        })
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
        Ok(result)
    }

    /// Execute a mutation and broadcast the rows it changed.
    pub async fn mutate<M>(&self, mutation: M) -> Result<M::Output, AppError>
    where
        M: Mutation + Send + 'static,
        M::Output: Send + 'static,
    {
        let store = self.store.clone();
        let (output, changes) = tokio::task::spawn_blocking(move || {
            let mut guard = lock(&store)?;
            Ok::<_, anyhow::Error>(guard.execute(mutation)?)
        })
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

        for change in changes {
            // No subscribers is fine.
            let _ = self.event_tx.send(change);
        }
        Ok(output)
    }
}

async fn watch(
    store: Arc<Mutex<Store>>,
    tx: broadcast::Sender<Change>,
    mut last_seen: Option<SystemTime>,
) {
    loop {
        tokio::time::sleep(WATCH_INTERVAL).await;
        let store = store.clone();
        let polled = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
            let mut guard = lock(&store)?;
            let mtime = guard.modified();
            if !needs_refetch(mtime, last_seen, SystemTime::now()) {
                return Ok((last_seen, Vec::new()));
            }
            Ok((mtime, guard.refetch()?))
        })
        .await;

        match polled {
            Ok(Ok((mtime, changes))) => {
                last_seen = mtime;
                if !changes.is_empty() {
                    tracing::debug!(changes = changes.len(), "external write picked up");
                }
                for change in changes {
                    let _ = tx.send(change);
                }
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "refetch failed"),
            Err(e) => tracing::warn!(error = %e, "watcher task failed"),
        }
    }
}

/// Refetch diffs against memory, so a spurious re-read only costs a load.
fn needs_refetch(
    mtime: Option<SystemTime>,
    last_seen: Option<SystemTime>,
    now: SystemTime,
) -> bool {
    let Some(mtime) = mtime else {
        return false;
    };
    if Some(mtime) != last_seen {
        return true;
    }
    match now.duration_since(mtime) {
        Ok(age) => age < MTIME_SETTLE,
        // mtime in the future: clock skew, keep looking
        Err(_) => true,
    }
}
