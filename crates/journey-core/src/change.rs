//! Row-level changes.
//!
//! Every mutation reduces to a list of [`Change`]s. Backends persist them,
//! the server broadcasts them, and [`Change::apply_to`] replays a change
//! received from elsewhere onto an in-memory [`Snapshot`] (last writer wins).

use crate::idea::Idea;
use crate::note::Note;
use crate::paths;
use crate::project::{Feature, Project};
use crate::skill::Skill;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    /// Insert or update a project row. Features travel separately.
    PutProject { project: Project },
    DeleteProject { id: String },
    PutFeature { feature: Feature },
    DeleteFeature { project_id: String, id: String },
    PutSkill { skill: Skill },
    DeleteSkill { id: String },
    PutIdea { idea: Idea },
    DeleteIdea { id: String },
    PutNote { note: Note },
    DeleteNote { id: String },
}

/// The key-value collection a change lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Projects,
    Skills,
    Ideas,
    Notes,
}

impl Collection {
    pub fn all() -> &'static [Collection] {
        &[
            Collection::Projects,
            Collection::Skills,
            Collection::Ideas,
            Collection::Notes,
        ]
    }

    pub fn key(self) -> &'static str {
        match self {
            Collection::Projects => paths::PROJECTS_KEY,
            Collection::Skills => paths::SKILLS_KEY,
            Collection::Ideas => paths::IDEAS_KEY,
            Collection::Notes => paths::NOTES_KEY,
        }
    }
}

impl Change {
    pub fn put_project(project: &Project) -> Self {
        Change::PutProject {
            project: project.without_features(),
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Change::PutProject { .. }
            | Change::DeleteProject { .. }
            | Change::PutFeature { .. }
            | Change::DeleteFeature { .. } => Collection::Projects,
            Change::PutSkill { .. } | Change::DeleteSkill { .. } => Collection::Skills,
            Change::PutIdea { .. } | Change::DeleteIdea { .. } => Collection::Ideas,
            Change::PutNote { .. } | Change::DeleteNote { .. } => Collection::Notes,
        }
    }

    /// Replay this change onto `snap`. Features whose project is unknown are
    /// dropped, matching a foreign key the row could not satisfy.
    pub fn apply_to(&self, snap: &mut Snapshot) {
        match self {
            Change::PutProject { project } => {
                match snap.projects.iter_mut().find(|p| p.id == project.id) {
                    Some(existing) => {
                        let features = std::mem::take(&mut existing.features);
                        *existing = project.clone();
                        existing.features = features;
                    }
                    None => snap.projects.push(project.clone()),
                }
            }
            Change::DeleteProject { id } => snap.projects.retain(|p| &p.id != id),
            Change::PutFeature { feature } => {
                let Some(project) = snap
                    .projects
                    .iter_mut()
                    .find(|p| p.id == feature.project_id)
                else {
                    tracing::debug!(feature = %feature.id, "dropping feature for unknown project");
                    return;
                };
                match project.features.iter_mut().find(|f| f.id == feature.id) {
                    Some(existing) => *existing = feature.clone(),
                    None => project.features.push(feature.clone()),
                }
            }
            Change::DeleteFeature { project_id, id } => {
                if let Some(project) = snap.projects.iter_mut().find(|p| &p.id == project_id) {
                    project.features.retain(|f| &f.id != id);
                }
            }
            Change::PutSkill { skill } => upsert(&mut snap.skills, skill, |s| &s.id),
            Change::DeleteSkill { id } => snap.skills.retain(|s| &s.id != id),
            Change::PutIdea { idea } => upsert(&mut snap.ideas, idea, |i| &i.id),
            Change::DeleteIdea { id } => snap.ideas.retain(|i| &i.id != id),
            Change::PutNote { note } => upsert(&mut snap.notes, note, |n| &n.id),
            Change::DeleteNote { id } => snap.notes.retain(|n| &n.id != id),
        }
        snap.normalize();
    }
}

fn upsert<T: Clone>(items: &mut Vec<T>, item: &T, id: impl Fn(&T) -> &String) {
    match items.iter_mut().find(|x| id(x) == id(item)) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectStatus;

    #[test]
    fn put_project_keeps_existing_features() {
        let mut snap = Snapshot::default();
        let mut p = Project::new("Kanban", "", ProjectStatus::InProgress);
        p.push_feature("board");
        snap.projects.push(p.clone());

        let mut renamed = p.without_features();
        renamed.title = "Kanban board".into();
        Change::PutProject { project: renamed }.apply_to(&mut snap);

        assert_eq!(snap.projects[0].title, "Kanban board");
        assert_eq!(snap.projects[0].features.len(), 1);
    }

    #[test]
    fn orphan_feature_is_dropped() {
        let mut snap = Snapshot::default();
        let feature = crate::project::Feature::new("ghost", "x");
        Change::PutFeature { feature }.apply_to(&mut snap);
        assert!(snap.projects.is_empty());
    }

    #[test]
    fn later_put_wins() {
        let mut snap = Snapshot::default();
        let mut skill = Skill::new("Rust");
        Change::PutSkill { skill: skill.clone() }.apply_to(&mut snap);
        skill.level = 4;
        Change::PutSkill { skill: skill.clone() }.apply_to(&mut snap);
        assert_eq!(snap.skills.len(), 1);
        assert_eq!(snap.skills[0].level, 4);
    }

    #[test]
    fn change_serializes_with_op_tag() {
        let json = serde_json::to_value(Change::DeleteNote { id: "n1".into() }).unwrap();
        assert_eq!(json["op"], "delete_note");
        assert_eq!(json["id"], "n1");
    }

    #[test]
    fn feature_changes_belong_to_projects_collection() {
        let c = Change::DeleteFeature {
            project_id: "p".into(),
            id: "f".into(),
        };
        assert_eq!(c.collection(), Collection::Projects);
        assert_eq!(c.collection().key(), "projects");
    }
}
