//! Persistence adapters.
//!
//! A backend loads a full [`Snapshot`] and persists the row [`Change`]s a
//! mutation produced. Key-value backends rewrite whole collections from the
//! post-mutation snapshot; relational backends apply the rows one by one.

mod kv;
mod memory;
mod relational;

pub use self::kv::KvBackend;
pub use self::memory::MemoryBackend;
pub use self::relational::RedbBackend;

use crate::change::Change;
use crate::config::{BackendConfig, Config};
use crate::error::Result;
use crate::paths;
use crate::snapshot::Snapshot;
use std::path::Path;
use std::time::SystemTime;

pub trait Backend: Send {
    fn name(&self) -> &'static str;

    /// Read every collection.
    fn load(&self) -> Result<Snapshot>;

    /// Persist `changes`. `after` is the in-memory state once they are applied.
    fn persist(&mut self, changes: &[Change], after: &Snapshot) -> Result<()>;

    /// Last time the underlying storage was written, when it can tell.
    fn modified(&self) -> Option<SystemTime> {
        None
    }
}

/// Build the backend selected in `config`.
pub fn open(root: &Path, config: &Config) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match &config.backend {
        BackendConfig::Kv => Box::new(KvBackend::new(paths::data_dir(root))),
        BackendConfig::Redb { file } => Box::new(RedbBackend::open(&paths::redb_path(root, file))?),
        BackendConfig::Memory => Box::new(MemoryBackend::default()),
    };
    tracing::debug!(backend = backend.name(), root = %root.display(), "opened backend");
    Ok(backend)
}

/// Latest mtime of the files directly inside `dir`.
pub(crate) fn latest_mtime(dir: &Path) -> Option<SystemTime> {
    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok()?.modified().ok())
        .max()
}
