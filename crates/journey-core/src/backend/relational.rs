//! Relational persistence in a redb file.
//!
//! # Table design
//!
//! ```text
//! projects        id                       -> Project row (no features, no skills)
//! features        "{project_id}:{id}"      -> Feature row
//! project_skills  "{project_id}:{pos:08}"  -> skill id
//! skills          id                       -> Skill row
//! ideas           id                       -> Idea row
//! notes           id                       -> Note row
//! ```
//!
//! Child keys are prefixed with the owning project id so deleting a project
//! removes its features and skill links in the same write transaction.

use super::Backend;
use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::project::{Feature, Project};
use crate::snapshot::Snapshot;
use redb::{Database, ReadableTable, Table, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const PROJECTS: TableDefinition<&str, &[u8]> = TableDefinition::new("projects");
const FEATURES: TableDefinition<&str, &[u8]> = TableDefinition::new("features");
const PROJECT_SKILLS: TableDefinition<&str, &str> = TableDefinition::new("project_skills");
const SKILLS: TableDefinition<&str, &[u8]> = TableDefinition::new("skills");
const IDEAS: TableDefinition<&str, &[u8]> = TableDefinition::new("ideas");
const NOTES: TableDefinition<&str, &[u8]> = TableDefinition::new("notes");

fn db_err(e: impl std::fmt::Display) -> JourneyError {
    JourneyError::Backend(e.to_string())
}

fn child_key(project_id: &str, child: &str) -> String {
    format!("{project_id}:{child}")
}

fn link_key(project_id: &str, pos: usize) -> String {
    format!("{project_id}:{pos:08}")
}

fn owner(key: &str) -> &str {
    key.split_once(':').map(|(p, _)| p).unwrap_or(key)
}

fn encode<T: Serialize>(row: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(row)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Remove every row of `table` whose key belongs to `project_id`.
fn remove_children<V: redb::Value + 'static>(
    table: &mut Table<'_, &'static str, V>,
    project_id: &str,
) -> Result<()> {
    let mut doomed = Vec::new();
    for entry in table.iter().map_err(db_err)? {
        let (k, _) = entry.map_err(db_err)?;
        if owner(k.value()) == project_id {
            doomed.push(k.value().to_string());
        }
    }
    for key in doomed {
        table.remove(key.as_str()).map_err(db_err)?;
    }
    Ok(())
}

fn read_rows<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for entry in table.iter().map_err(db_err)? {
        let (_, v) = entry.map_err(db_err)?;
        rows.push(decode(v.value())?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// RedbBackend
// ---------------------------------------------------------------------------

pub struct RedbBackend {
    db: Database,
    path: PathBuf,
}

impl RedbBackend {
    /// Open or create the database at `path` and make sure every table exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(PROJECTS).map_err(db_err)?;
        wt.open_table(FEATURES).map_err(db_err)?;
        wt.open_table(PROJECT_SKILLS).map_err(db_err)?;
        wt.open_table(SKILLS).map_err(db_err)?;
        wt.open_table(IDEAS).map_err(db_err)?;
        wt.open_table(NOTES).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }
}

impl Backend for RedbBackend {
    fn name(&self) -> &'static str {
        "redb"
    }

    fn load(&self) -> Result<Snapshot> {
        let rt = self.db.begin_read().map_err(db_err)?;

        let mut projects: Vec<Project> = read_rows(&rt.open_table(PROJECTS).map_err(db_err)?)?;
        let features: Vec<Feature> = read_rows(&rt.open_table(FEATURES).map_err(db_err)?)?;

        // Keys sort by position within a project, so links come back in order.
        let mut links: HashMap<String, Vec<String>> = HashMap::new();
        let link_table = rt.open_table(PROJECT_SKILLS).map_err(db_err)?;
        for entry in link_table.iter().map_err(db_err)? {
            let (k, v) = entry.map_err(db_err)?;
            links
                .entry(owner(k.value()).to_string())
                .or_default()
                .push(v.value().to_string());
        }

        let mut by_project: HashMap<String, Vec<Feature>> = HashMap::new();
        for f in features {
            by_project.entry(f.project_id.clone()).or_default().push(f);
        }
        for p in &mut projects {
            p.features = by_project.remove(&p.id).unwrap_or_default();
            p.associated_skills = links.remove(&p.id).unwrap_or_default();
        }
        for orphan in by_project.keys() {
            tracing::warn!(project = %orphan, "features reference a missing project");
        }

        let mut snap = Snapshot {
            projects,
            skills: read_rows(&rt.open_table(SKILLS).map_err(db_err)?)?,
            ideas: read_rows(&rt.open_table(IDEAS).map_err(db_err)?)?,
            notes: read_rows(&rt.open_table(NOTES).map_err(db_err)?)?,
        };
        snap.normalize();
        Ok(snap)
    }

    fn persist(&mut self, changes: &[Change], _after: &Snapshot) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut projects = wt.open_table(PROJECTS).map_err(db_err)?;
            let mut features = wt.open_table(FEATURES).map_err(db_err)?;
            let mut links = wt.open_table(PROJECT_SKILLS).map_err(db_err)?;
            let mut skills = wt.open_table(SKILLS).map_err(db_err)?;
            let mut ideas = wt.open_table(IDEAS).map_err(db_err)?;
            let mut notes = wt.open_table(NOTES).map_err(db_err)?;

            for change in changes {
                match change {
                    Change::PutProject { project } => {
                        let mut row = project.without_features();
                        let skill_ids = std::mem::take(&mut row.associated_skills);
                        projects
                            .insert(row.id.as_str(), encode(&row)?.as_slice())
                            .map_err(db_err)?;
                        remove_children(&mut links, &row.id)?;
                        for (pos, skill_id) in skill_ids.iter().enumerate() {
                            links
                                .insert(link_key(&row.id, pos).as_str(), skill_id.as_str())
                                .map_err(db_err)?;
                        }
                    }
                    Change::DeleteProject { id } => {
                        projects.remove(id.as_str()).map_err(db_err)?;
                        remove_children(&mut features, id)?;
                        remove_children(&mut links, id)?;
                    }
                    Change::PutFeature { feature } => {
                        let key = child_key(&feature.project_id, &feature.id);
                        features
                            .insert(key.as_str(), encode(feature)?.as_slice())
                            .map_err(db_err)?;
                    }
                    Change::DeleteFeature { project_id, id } => {
                        features
                            .remove(child_key(project_id, id).as_str())
                            .map_err(db_err)?;
                    }
                    Change::PutSkill { skill } => {
                        skills
                            .insert(skill.id.as_str(), encode(skill)?.as_slice())
                            .map_err(db_err)?;
                    }
                    Change::DeleteSkill { id } => {
                        skills.remove(id.as_str()).map_err(db_err)?;
                    }
                    Change::PutIdea { idea } => {
                        ideas
                            .insert(idea.id.as_str(), encode(idea)?.as_slice())
                            .map_err(db_err)?;
                    }
                    Change::DeleteIdea { id } => {
                        ideas.remove(id.as_str()).map_err(db_err)?;
                    }
                    Change::PutNote { note } => {
                        notes
                            .insert(note.id.as_str(), encode(note)?.as_slice())
                            .map_err(db_err)?;
                    }
                    Change::DeleteNote { id } => {
                        notes.remove(id.as_str()).map_err(db_err)?;
                    }
                }
            }
        }
        wt.commit().map_err(db_err)?;
        tracing::debug!(rows = changes.len(), "committed changes");
        Ok(())
    }

    fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).ok()?.modified().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
