use super::{level_up_skills, next_project_order, renumber_projects, required, Mutation};
use crate::change::Change;
use crate::error::Result;
use crate::order;
use crate::project::{Project, StatusChange};
use crate::skill::Skill;
use crate::snapshot::Snapshot;
use crate::types::ProjectStatus;
use serde::Serialize;

#[derive(Debug, Clone, Default)]
pub struct AddProject {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub features: Vec<String>,
    pub skills: Vec<String>,
}

impl Mutation for AddProject {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        let title = required("project title", &self.title)?;
        for id in &self.skills {
            data.skill(id)?;
        }

        let mut project = Project::new(title, self.description.trim(), self.status);
        project.sort_order = next_project_order(data);
        project.associated_skills = self.skills;
        for text in &self.features {
            project.push_feature(required("feature text", text)?);
        }
        project.refresh_progress();

        let mut changes = vec![Change::put_project(&project)];
        changes.extend(project.features.iter().map(|f| Change::PutFeature {
            feature: f.clone(),
        }));
        data.projects.push(project.clone());
        Ok((project, changes))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Mutation for UpdateProject {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        let title = self
            .title
            .as_deref()
            .map(|t| required("project title", t))
            .transpose()?;
        let project = data.project_mut(&self.id)?;
        if let Some(t) = title {
            project.title = t;
        }
        if let Some(d) = self.description {
            project.description = d.trim().to_string();
        }
        project.touch();
        Ok((project.clone(), vec![Change::put_project(project)]))
    }
}

/// Delete a project together with its features.
#[derive(Debug, Clone)]
pub struct RemoveProject {
    pub id: String,
}

impl Mutation for RemoveProject {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        let pos = data
            .projects
            .iter()
            .position(|p| p.id == self.id)
            .ok_or_else(|| crate::JourneyError::ProjectNotFound(self.id.clone()))?;
        let project = data.projects.remove(pos);
        Ok((project.clone(), delete_project_rows(&project)))
    }
}

fn delete_project_rows(project: &Project) -> Vec<Change> {
    let mut changes: Vec<Change> = project
        .features
        .iter()
        .map(|f| Change::DeleteFeature {
            project_id: project.id.clone(),
            id: f.id.clone(),
        })
        .collect();
    changes.push(Change::DeleteProject {
        id: project.id.clone(),
    });
    changes
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub project: Project,
    pub status_change: Option<StatusChange>,
    pub leveled: Vec<Skill>,
}

/// Move a project into another lifecycle bucket.
#[derive(Debug, Clone)]
pub struct MoveProject {
    pub id: String,
    pub status: ProjectStatus,
}

impl Mutation for MoveProject {
    type Output = MoveOutcome;

    fn apply(self, data: &mut Snapshot) -> Result<(MoveOutcome, Vec<Change>)> {
        let project = data.project_mut(&self.id)?;
        if project.status == self.status {
            return Ok((
                MoveOutcome {
                    project: project.clone(),
                    status_change: None,
                    leveled: Vec::new(),
                },
                Vec::new(),
            ));
        }
        let change = StatusChange {
            from: project.status,
            to: self.status,
        };
        project.status = self.status;
        project.touch();
        let mut changes = vec![Change::put_project(project)];

        let leveled = if change.entered_completed() {
            level_up_skills(data, &self.id, &mut changes)?
        } else {
            Vec::new()
        };
        let project = data.project(&self.id)?.clone();
        Ok((
            MoveOutcome {
                project,
                status_change: Some(change),
                leveled,
            },
            changes,
        ))
    }
}

/// Delete every project. Returns how many were removed.
#[derive(Debug, Clone)]
pub struct ClearProjects;

impl Mutation for ClearProjects {
    type Output = usize;

    fn apply(self, data: &mut Snapshot) -> Result<(usize, Vec<Change>)> {
        let removed = std::mem::take(&mut data.projects);
        let changes = removed.iter().flat_map(delete_project_rows).collect();
        Ok((removed.len(), changes))
    }
}

/// Move a project within the list of projects sharing `status`. Indexes are
/// positions in that filtered list.
#[derive(Debug, Clone)]
pub struct ReorderProjects {
    pub status: ProjectStatus,
    pub from: usize,
    pub to: usize,
}

impl Mutation for ReorderProjects {
    type Output = Vec<Project>;

    fn apply(self, data: &mut Snapshot) -> Result<(Vec<Project>, Vec<Change>)> {
        let slots: Vec<usize> = data
            .projects
            .iter()
            .enumerate()
            .filter(|(_, p)| p.status == self.status)
            .map(|(i, _)| i)
            .collect();
        let mut bucket: Vec<Project> = slots.iter().map(|&i| data.projects[i].clone()).collect();
        order::reorder(&mut bucket, self.from, self.to)?;

        for (&slot, project) in slots.iter().zip(bucket) {
            data.projects[slot] = project;
        }
        let mut changes = Vec::new();
        renumber_projects(data, &mut changes);

        let ordered = data
            .projects_by_status(self.status)
            .into_iter()
            .cloned()
            .collect();
        Ok((ordered, changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{AddSkill, AssociateSkill};

    fn add(data: &mut Snapshot, title: &str, status: ProjectStatus) -> Project {
        AddProject {
            title: title.into(),
            status,
            ..Default::default()
        }
        .apply(data)
        .unwrap()
        .0
    }

    #[test]
    fn add_project_assigns_order_and_features() {
        let mut data = Snapshot::default();
        add(&mut data, "First", ProjectStatus::InProgress);
        let (p, changes) = AddProject {
            title: "  Second ".into(),
            features: vec!["a".into(), "b".into()],
            ..Default::default()
        }
        .apply(&mut data)
        .unwrap();
        assert_eq!(p.title, "Second");
        assert_eq!(p.sort_order, 1);
        assert_eq!(p.features.len(), 2);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn add_project_requires_title() {
        let mut data = Snapshot::default();
        let err = AddProject::default().apply(&mut data).unwrap_err();
        assert!(matches!(err, crate::JourneyError::EmptyField(_)));
        assert!(data.projects.is_empty());
    }

    #[test]
    fn add_project_with_unknown_skill_fails() {
        let mut data = Snapshot::default();
        let err = AddProject {
            title: "x".into(),
            skills: vec!["ghost".into()],
            ..Default::default()
        }
        .apply(&mut data)
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn remove_project_cascades_features() {
        let mut data = Snapshot::default();
        let (p, _) = AddProject {
            title: "Doomed".into(),
            features: vec!["a".into(), "b".into()],
            ..Default::default()
        }
        .apply(&mut data)
        .unwrap();
        let (_, changes) = RemoveProject { id: p.id.clone() }.apply(&mut data).unwrap();
        let deleted_features = changes
            .iter()
            .filter(|c| matches!(c, Change::DeleteFeature { project_id, .. } if *project_id == p.id))
            .count();
        assert_eq!(deleted_features, 2);
        assert!(matches!(changes.last(), Some(Change::DeleteProject { .. })));
        assert!(data.projects.is_empty());
    }

    #[test]
    fn move_to_completed_levels_skills() {
        let mut data = Snapshot::default();
        let (skill, _) = AddSkill { name: "Rust".into() }.apply(&mut data).unwrap();
        let p = add(&mut data, "CLI", ProjectStatus::InProgress);
        AssociateSkill {
            project_id: p.id.clone(),
            skill_id: skill.id.clone(),
        }
        .apply(&mut data)
        .unwrap();

        let (out, _) = MoveProject {
            id: p.id.clone(),
            status: ProjectStatus::Completed,
        }
        .apply(&mut data)
        .unwrap();
        assert_eq!(out.project.status, ProjectStatus::Completed);
        assert_eq!(out.leveled.len(), 1);
        assert_eq!(data.skill(&skill.id).unwrap().level, 2);

        // Moving back does not lower the level.
        MoveProject {
            id: p.id.clone(),
            status: ProjectStatus::InProgress,
        }
        .apply(&mut data)
        .unwrap();
        assert_eq!(data.skill(&skill.id).unwrap().level, 2);
    }

    #[test]
    fn move_to_same_status_is_noop() {
        let mut data = Snapshot::default();
        let p = add(&mut data, "CLI", ProjectStatus::Idea);
        let (out, changes) = MoveProject {
            id: p.id,
            status: ProjectStatus::Idea,
        }
        .apply(&mut data)
        .unwrap();
        assert!(out.status_change.is_none());
        assert!(changes.is_empty());
    }

    #[test]
    fn reorder_within_bucket_skips_other_statuses() {
        let mut data = Snapshot::default();
        let a = add(&mut data, "a", ProjectStatus::InProgress);
        let idea = add(&mut data, "idea", ProjectStatus::Idea);
        let b = add(&mut data, "b", ProjectStatus::InProgress);
        let c = add(&mut data, "c", ProjectStatus::InProgress);

        let (ordered, _) = ReorderProjects {
            status: ProjectStatus::InProgress,
            from: 2,
            to: 0,
        }
        .apply(&mut data)
        .unwrap();
        let titles: Vec<&str> = ordered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
        // The idea keeps its global slot.
        assert_eq!(data.projects[1].id, idea.id);
        assert_eq!(data.projects[0].id, c.id);
        assert_eq!(data.projects[2].id, a.id);
        assert_eq!(data.projects[3].id, b.id);
        for (i, p) in data.projects.iter().enumerate() {
            assert_eq!(p.sort_order, i as u32);
        }
    }

    #[test]
    fn reorder_out_of_range_fails() {
        let mut data = Snapshot::default();
        add(&mut data, "a", ProjectStatus::InProgress);
        assert!(ReorderProjects {
            status: ProjectStatus::InProgress,
            from: 0,
            to: 1,
        }
        .apply(&mut data)
        .is_err());
    }

    #[test]
    fn clear_projects_removes_all() {
        let mut data = Snapshot::default();
        add(&mut data, "a", ProjectStatus::InProgress);
        add(&mut data, "b", ProjectStatus::Completed);
        let (n, changes) = ClearProjects.apply(&mut data).unwrap();
        assert_eq!(n, 2);
        assert_eq!(changes.len(), 2);
        assert!(data.projects.is_empty());
    }
}
