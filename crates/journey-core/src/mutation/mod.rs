//! Store commands.
//!
//! Each command validates its input, edits the [`Snapshot`] in place and
//! returns the row [`Change`]s a backend needs to persist. The store wraps
//! every command in a snapshot/restore pair, so a command that fails halfway
//! or whose changes cannot be persisted leaves memory untouched.

mod feature;
mod idea;
mod note;
mod project;
mod skill;

pub use feature::{AddFeature, FeatureOutcome, RemoveFeature, ReorderFeatures, ToggleFeature, UpdateFeature};
pub use idea::{AddIdea, AddIdeaDetail, PromoteIdea, RemoveIdea, ReorderIdeas, UpdateIdea};
pub use note::{AddNote, RemoveNote, UpdateNote};
pub use project::{
    AddProject, ClearProjects, MoveOutcome, MoveProject, RemoveProject, ReorderProjects,
    UpdateProject,
};
pub use skill::{AssociateSkill, AddSkill, DissociateSkill, RemoveSkill, ResetSkill, UpdateSkill};

use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::project::StatusChange;
use crate::skill::Skill;
use crate::snapshot::Snapshot;

pub trait Mutation: std::fmt::Debug {
    type Output;

    fn apply(self, data: &mut Snapshot) -> Result<(Self::Output, Vec<Change>)>;
}

/// Trim `value` and reject it when empty.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(JourneyError::EmptyField(field));
    }
    Ok(value.to_string())
}

/// Raise every distinct skill associated with `project_id` by one level.
/// Ids that no longer resolve to a skill are skipped.
pub(crate) fn level_up_skills(
    data: &mut Snapshot,
    project_id: &str,
    changes: &mut Vec<Change>,
) -> Result<Vec<Skill>> {
    let skill_ids = data.project(project_id)?.distinct_skills();
    let mut leveled = Vec::new();
    for id in skill_ids {
        let Ok(skill) = data.skill_mut(&id) else {
            tracing::debug!(skill = %id, project = %project_id, "skipping dangling skill id");
            continue;
        };
        skill.level_up();
        tracing::info!(skill = %skill.name, level = skill.level, "skill leveled up");
        changes.push(Change::PutSkill {
            skill: skill.clone(),
        });
        leveled.push(skill.clone());
    }
    Ok(leveled)
}

/// Recompute progress for a project after its features changed, record the
/// project row, and level skills if it just completed.
pub(crate) fn settle_progress(
    data: &mut Snapshot,
    project_id: &str,
    changes: &mut Vec<Change>,
) -> Result<(Option<StatusChange>, Vec<Skill>)> {
    let project = data.project_mut(project_id)?;
    let status_change = project.refresh_progress();
    project.touch();
    changes.push(Change::put_project(project));

    let leveled = match status_change {
        Some(c) if c.entered_completed() => level_up_skills(data, project_id, changes)?,
        _ => Vec::new(),
    };
    Ok((status_change, leveled))
}

/// Rewrite project `sort_order` to the global position, emitting a row
/// change for every project whose position moved.
pub(crate) fn renumber_projects(data: &mut Snapshot, changes: &mut Vec<Change>) {
    for (i, p) in data.projects.iter_mut().enumerate() {
        if p.sort_order != i as u32 {
            p.sort_order = i as u32;
            changes.push(Change::put_project(p));
        }
    }
}

pub(crate) fn next_project_order(data: &Snapshot) -> u32 {
    data.projects
        .iter()
        .map(|p| p.sort_order + 1)
        .max()
        .unwrap_or(0)
}
