use super::Backend;
use crate::change::{Change, Collection};
use crate::error::Result;
use crate::io;
use crate::migrations;
use crate::snapshot::Snapshot;
use serde_json::Value;
use std::collections::BTreeSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Key-value persistence: each collection is a single serialized entry
/// (`<dir>/<key>.json`) rewritten whenever one of its records changes.
pub struct KvBackend {
    dir: PathBuf,
}

impl KvBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read one entry as raw JSON. A corrupt entry is logged and treated as
    /// empty so the rest of the journey still loads.
    fn read_entry(&self, key: &str) -> Value {
        match io::read_json::<Value>(&self.entry(key)) {
            Ok(Some(v)) => v,
            Ok(None) => Value::Null,
            Err(e) => {
                tracing::error!(key, error = %e, "unreadable entry, starting empty");
                Value::Null
            }
        }
    }

    fn render(collection: Collection, snap: &Snapshot) -> Result<Vec<u8>> {
        let bytes = match collection {
            Collection::Projects => serde_json::to_vec_pretty(&snap.projects)?,
            Collection::Skills => serde_json::to_vec_pretty(&snap.skills)?,
            Collection::Ideas => serde_json::to_vec_pretty(&snap.ideas)?,
            Collection::Notes => serde_json::to_vec_pretty(&snap.notes)?,
        };
        Ok(bytes)
    }

    /// Put back entries already replaced by a commit that failed partway.
    fn restore(committed: &[(PathBuf, Option<Vec<u8>>)]) {
        for (path, previous) in committed.iter().rev() {
            let result = match previous {
                Some(bytes) => io::atomic_write(path, bytes),
                None => std::fs::remove_file(path).map_err(Into::into),
            };
            if let Err(e) = result {
                tracing::error!(path = %path.display(), error = %e, "failed to restore entry");
            }
        }
    }
}

impl Backend for KvBackend {
    fn name(&self) -> &'static str {
        "kv"
    }

    fn load(&self) -> Result<Snapshot> {
        let mut snap = Snapshot {
            projects: migrations::upgrade_projects(self.read_entry(Collection::Projects.key())),
            skills: migrations::upgrade_skills(self.read_entry(Collection::Skills.key())),
            ideas: migrations::upgrade_ideas(self.read_entry(Collection::Ideas.key())),
            notes: migrations::upgrade_notes(self.read_entry(Collection::Notes.key())),
        };
        snap.normalize();
        Ok(snap)
    }

    /// Every touched entry is rendered to a temp file before any is renamed
    /// into place. If a rename fails, entries already replaced get their
    /// previous contents back, so a failed command leaves disk as it was.
    fn persist(&mut self, changes: &[Change], after: &Snapshot) -> Result<()> {
        let touched: BTreeSet<Collection> = changes.iter().map(Change::collection).collect();
        if touched.is_empty() {
            return Ok(());
        }
        io::ensure_dir(&self.dir)?;

        let mut staged = Vec::new();
        for collection in touched {
            let path = self.entry(collection.key());
            let previous = match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(&Self::render(collection, after)?)?;
            staged.push((collection, path, previous, tmp));
        }

        let mut committed = Vec::new();
        for (collection, path, previous, tmp) in staged {
            if let Err(e) = tmp.persist(&path) {
                Self::restore(&committed);
                return Err(e.error.into());
            }
            tracing::debug!(key = collection.key(), "wrote entry");
            committed.push((path, previous));
        }
        Ok(())
    }

    fn modified(&self) -> Option<SystemTime> {
        super::latest_mtime(&self.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;
    use crate::project::Project;
    use crate::types::ProjectStatus;
    use tempfile::TempDir;

    #[test]
    fn empty_dir_loads_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let backend = KvBackend::new(dir.path().join("data"));
        assert_eq!(backend.load().unwrap(), Snapshot::default());
    }

    #[test]
    fn only_touched_collections_are_written() {
        let dir = TempDir::new().unwrap();
        let mut backend = KvBackend::new(dir.path());
        let note = Note::new("idea").unwrap();
        let snap = Snapshot {
            notes: vec![note.clone()],
            ..Default::default()
        };
        backend
            .persist(&[Change::PutNote { note }], &snap)
            .unwrap();
        assert!(dir.path().join("notes.json").exists());
        assert!(!dir.path().join("projects.json").exists());
    }

    #[test]
    fn persisted_projects_reload_with_features() {
        let dir = TempDir::new().unwrap();
        let mut backend = KvBackend::new(dir.path());
        let mut p = Project::new("Kv", "", ProjectStatus::InProgress);
        p.push_feature("write");
        let snap = Snapshot {
            projects: vec![p.clone()],
            ..Default::default()
        };
        backend
            .persist(&[Change::put_project(&p)], &snap)
            .unwrap();
        let loaded = backend.load().unwrap();
        assert_eq!(loaded.projects, vec![p]);
    }

    #[test]
    fn corrupt_entry_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("skills.json"), b"{not json").unwrap();
        let backend = KvBackend::new(dir.path());
        assert!(backend.load().unwrap().skills.is_empty());
    }

    #[test]
    fn restore_puts_back_replaced_entries() {
        let dir = TempDir::new().unwrap();
        let replaced = dir.path().join("projects.json");
        let created = dir.path().join("skills.json");
        std::fs::write(&replaced, b"[\"new\"]").unwrap();
        std::fs::write(&created, b"[]").unwrap();

        KvBackend::restore(&[
            (replaced.clone(), Some(b"[\"old\"]".to_vec())),
            (created.clone(), None),
        ]);

        assert_eq!(std::fs::read(&replaced).unwrap(), b"[\"old\"]");
        assert!(!created.exists());
    }

    #[test]
    fn unreadable_target_fails_before_anything_is_written() {
        let dir = TempDir::new().unwrap();
        let mut backend = KvBackend::new(dir.path());
        std::fs::create_dir(dir.path().join("skills.json")).unwrap();

        let p = Project::new("Half", "", ProjectStatus::InProgress);
        let skill = crate::skill::Skill::new("Rust");
        let snap = Snapshot {
            projects: vec![p.clone()],
            skills: vec![skill.clone()],
            ..Default::default()
        };
        let changes = [Change::put_project(&p), Change::PutSkill { skill }];
        assert!(backend.persist(&changes, &snap).is_err());
        assert!(!dir.path().join("projects.json").exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temp files are cleaned up");
    }

    #[test]
    fn modified_tracks_writes() {
        let dir = TempDir::new().unwrap();
        let mut backend = KvBackend::new(dir.path());
        assert!(backend.modified().is_none());
        let note = Note::new("x").unwrap();
        let snap = Snapshot {
            notes: vec![note.clone()],
            ..Default::default()
        };
        backend.persist(&[Change::PutNote { note }], &snap).unwrap();
        assert!(backend.modified().is_some());
    }
}
