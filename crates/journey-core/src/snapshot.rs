use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::idea::Idea;
use crate::note::Note;
use crate::project::Project;
use crate::skill::Skill;
use crate::types::ProjectStatus;
use serde::{Deserialize, Serialize};

/// The four record collections held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub ideas: Vec<Idea>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Snapshot {
    // ---------------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------------

    pub fn project(&self, id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| JourneyError::ProjectNotFound(id.to_string()))
    }

    pub fn project_mut(&mut self, id: &str) -> Result<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| JourneyError::ProjectNotFound(id.to_string()))
    }

    pub fn skill(&self, id: &str) -> Result<&Skill> {
        self.skills
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| JourneyError::SkillNotFound(id.to_string()))
    }

    pub fn skill_mut(&mut self, id: &str) -> Result<&mut Skill> {
        self.skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| JourneyError::SkillNotFound(id.to_string()))
    }

    pub fn idea_mut(&mut self, id: &str) -> Result<&mut Idea> {
        self.ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| JourneyError::IdeaNotFound(id.to_string()))
    }

    pub fn note_mut(&mut self, id: &str) -> Result<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| JourneyError::NoteNotFound(id.to_string()))
    }

    pub fn projects_by_status(&self, status: ProjectStatus) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.status == status).collect()
    }

    /// Restore canonical ordering: projects and ideas by `sort_order`,
    /// features by `sort_order`, notes by timestamp. Sorts are stable.
    pub fn normalize(&mut self) {
        self.projects.sort_by_key(|p| p.sort_order);
        for p in &mut self.projects {
            p.features.sort_by_key(|f| f.sort_order);
        }
        self.ideas.sort_by_key(|i| i.sort_order);
        self.notes.sort_by_key(|n| n.timestamp);
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Row changes that turn `old` into `new`. Puts are ordered parent-first and
/// deletes child-first so the list can be replayed in order.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Vec<Change> {
    let mut changes = Vec::new();

    for p in &new.projects {
        let prev = old.projects.iter().find(|o| o.id == p.id);
        if prev.map(|o| o.without_features()) != Some(p.without_features()) {
            changes.push(Change::put_project(p));
        }
        for f in &p.features {
            let prev_f = prev.and_then(|o| o.features.iter().find(|x| x.id == f.id));
            if prev_f != Some(f) {
                changes.push(Change::PutFeature { feature: f.clone() });
            }
        }
        if let Some(o) = prev {
            for f in &o.features {
                if !p.features.iter().any(|x| x.id == f.id) {
                    changes.push(Change::DeleteFeature {
                        project_id: p.id.clone(),
                        id: f.id.clone(),
                    });
                }
            }
        }
    }
    for o in &old.projects {
        if !new.projects.iter().any(|p| p.id == o.id) {
            changes.push(Change::DeleteProject { id: o.id.clone() });
        }
    }

    diff_rows(
        &old.skills,
        &new.skills,
        |s| &s.id,
        |s| Change::PutSkill { skill: s.clone() },
        |id| Change::DeleteSkill { id },
        &mut changes,
    );
    diff_rows(
        &old.ideas,
        &new.ideas,
        |i| &i.id,
        |i| Change::PutIdea { idea: i.clone() },
        |id| Change::DeleteIdea { id },
        &mut changes,
    );
    diff_rows(
        &old.notes,
        &new.notes,
        |n| &n.id,
        |n| Change::PutNote { note: n.clone() },
        |id| Change::DeleteNote { id },
        &mut changes,
    );

    changes
}

fn diff_rows<T: PartialEq>(
    old: &[T],
    new: &[T],
    id: impl Fn(&T) -> &String,
    put: impl Fn(&T) -> Change,
    delete: impl Fn(String) -> Change,
    out: &mut Vec<Change>,
) {
    for item in new {
        if old.iter().find(|o| id(o) == id(item)) != Some(item) {
            out.push(put(item));
        }
    }
    for item in old {
        if !new.iter().any(|n| id(n) == id(item)) {
            out.push(delete(id(item).clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        let mut p = Project::new("Compiler", "toy", ProjectStatus::InProgress);
        p.push_feature("lexer");
        p.push_feature("parser");
        let mut snap = Snapshot {
            projects: vec![p],
            skills: vec![Skill::new("Rust")],
            ideas: vec![Idea::new("Game", "")],
            notes: vec![Note::new("hello").unwrap()],
        };
        snap.normalize();
        snap
    }

    #[test]
    fn identical_snapshots_have_no_diff() {
        let s = sample();
        assert!(diff(&s, &s.clone()).is_empty());
    }

    #[test]
    fn replaying_diff_reproduces_target() {
        let old = sample();
        let mut new = old.clone();
        new.projects[0].features[0].completed = true;
        new.projects[0].features.remove(1);
        new.projects[0].progress = 100;
        let mut extra = Project::new("Shell", "", ProjectStatus::Idea);
        extra.sort_order = 1;
        extra.push_feature("pipes");
        new.projects.push(extra);
        new.skills[0].level = 2;
        new.ideas.clear();
        new.notes.push(Note::new("second").unwrap());
        new.normalize();

        let changes = diff(&old, &new);
        let mut replay = old.clone();
        for c in &changes {
            c.apply_to(&mut replay);
        }
        assert_eq!(replay, new);
    }

    #[test]
    fn removed_project_yields_delete() {
        let old = sample();
        let mut new = old.clone();
        new.projects.clear();
        let changes = diff(&old, &new);
        assert!(changes
            .iter()
            .any(|c| matches!(c, Change::DeleteProject { .. })));
    }

    #[test]
    fn lookup_missing_project_errors() {
        let s = sample();
        assert!(matches!(
            s.project("nope"),
            Err(JourneyError::ProjectNotFound(_))
        ));
    }
}
