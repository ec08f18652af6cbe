use super::{required, settle_progress, Mutation};
use crate::change::Change;
use crate::error::Result;
use crate::order;
use crate::project::{Project, StatusChange};
use crate::skill::Skill;
use crate::snapshot::Snapshot;
use serde::Serialize;

/// Result of any feature edit: the refreshed project, the feature touched,
/// and the side effects of a progress change.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureOutcome {
    pub project: Project,
    pub feature_id: String,
    pub status_change: Option<StatusChange>,
    pub leveled: Vec<Skill>,
}

fn outcome(
    data: &mut Snapshot,
    project_id: &str,
    feature_id: String,
    mut changes: Vec<Change>,
) -> Result<(FeatureOutcome, Vec<Change>)> {
    let (status_change, leveled) = settle_progress(data, project_id, &mut changes)?;
    let project = data.project(project_id)?.clone();
    Ok((
        FeatureOutcome {
            project,
            feature_id,
            status_change,
            leveled,
        },
        changes,
    ))
}

#[derive(Debug, Clone)]
pub struct AddFeature {
    pub project_id: String,
    pub text: String,
}

impl Mutation for AddFeature {
    type Output = FeatureOutcome;

    fn apply(self, data: &mut Snapshot) -> Result<(FeatureOutcome, Vec<Change>)> {
        let text = required("feature text", &self.text)?;
        let project = data.project_mut(&self.project_id)?;
        let id = project.push_feature(text);
        let feature = project.feature(&id)?.clone();
        outcome(
            data,
            &self.project_id,
            id,
            vec![Change::PutFeature { feature }],
        )
    }
}

/// Flip a feature's completed flag.
#[derive(Debug, Clone)]
pub struct ToggleFeature {
    pub project_id: String,
    pub feature_id: String,
}

impl Mutation for ToggleFeature {
    type Output = FeatureOutcome;

    fn apply(self, data: &mut Snapshot) -> Result<(FeatureOutcome, Vec<Change>)> {
        let project = data.project_mut(&self.project_id)?;
        let feature = project.feature_mut(&self.feature_id)?;
        feature.completed = !feature.completed;
        let feature = feature.clone();
        outcome(
            data,
            &self.project_id,
            self.feature_id,
            vec![Change::PutFeature { feature }],
        )
    }
}

#[derive(Debug, Clone)]
pub struct UpdateFeature {
    pub project_id: String,
    pub feature_id: String,
    pub text: String,
}

impl Mutation for UpdateFeature {
    type Output = FeatureOutcome;

    fn apply(self, data: &mut Snapshot) -> Result<(FeatureOutcome, Vec<Change>)> {
        let text = required("feature text", &self.text)?;
        let project = data.project_mut(&self.project_id)?;
        let feature = project.feature_mut(&self.feature_id)?;
        feature.text = text;
        let feature = feature.clone();
        outcome(
            data,
            &self.project_id,
            self.feature_id,
            vec![Change::PutFeature { feature }],
        )
    }
}

#[derive(Debug, Clone)]
pub struct RemoveFeature {
    pub project_id: String,
    pub feature_id: String,
}

impl Mutation for RemoveFeature {
    type Output = FeatureOutcome;

    fn apply(self, data: &mut Snapshot) -> Result<(FeatureOutcome, Vec<Change>)> {
        let project = data.project_mut(&self.project_id)?;
        project.feature(&self.feature_id)?;
        project.features.retain(|f| f.id != self.feature_id);

        let mut changes = vec![Change::DeleteFeature {
            project_id: self.project_id.clone(),
            id: self.feature_id.clone(),
        }];
        renumber(project, &mut changes);
        outcome(data, &self.project_id, self.feature_id, changes)
    }
}

/// Splice a project's feature list from one index to another.
#[derive(Debug, Clone)]
pub struct ReorderFeatures {
    pub project_id: String,
    pub from: usize,
    pub to: usize,
}

impl Mutation for ReorderFeatures {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        let project = data.project_mut(&self.project_id)?;
        order::reorder(&mut project.features, self.from, self.to)?;
        let mut changes = Vec::new();
        renumber(project, &mut changes);
        project.touch();
        changes.push(Change::put_project(project));
        Ok((project.clone(), changes))
    }
}

/// Renumber features and emit a row for each one whose position moved.
fn renumber(project: &mut Project, changes: &mut Vec<Change>) {
    let before: Vec<u32> = project.features.iter().map(|f| f.sort_order).collect();
    project.renumber_features();
    for (f, old) in project.features.iter().zip(before) {
        if f.sort_order != old {
            changes.push(Change::PutFeature { feature: f.clone() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{AddProject, AddSkill, AssociateSkill};
    use crate::types::ProjectStatus;

    fn project(data: &mut Snapshot, features: &[&str]) -> Project {
        AddProject {
            title: "Tracker".into(),
            features: features.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
        .apply(data)
        .unwrap()
        .0
    }

    fn toggle(data: &mut Snapshot, p: &Project, idx: usize) -> FeatureOutcome {
        ToggleFeature {
            project_id: p.id.clone(),
            feature_id: p.features[idx].id.clone(),
        }
        .apply(data)
        .unwrap()
        .0
    }

    #[test]
    fn half_then_full_completes_project() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &["store", "cli"]);

        let out = toggle(&mut data, &p, 0);
        assert_eq!(out.project.progress, 50);
        assert_eq!(out.project.status, ProjectStatus::InProgress);

        let out = toggle(&mut data, &p, 1);
        assert_eq!(out.project.progress, 100);
        assert_eq!(out.project.status, ProjectStatus::Completed);
        assert!(out.status_change.unwrap().entered_completed());
    }

    #[test]
    fn completing_levels_each_distinct_skill_once() {
        let mut data = Snapshot::default();
        let (rust, _) = AddSkill { name: "Rust".into() }.apply(&mut data).unwrap();
        let (sql, _) = AddSkill { name: "SQL".into() }.apply(&mut data).unwrap();
        let p = project(&mut data, &["only"]);
        for id in [&rust.id, &rust.id, &sql.id] {
            AssociateSkill {
                project_id: p.id.clone(),
                skill_id: id.clone(),
            }
            .apply(&mut data)
            .unwrap();
        }

        let out = toggle(&mut data, &p, 0);
        assert_eq!(out.leveled.len(), 2);
        assert_eq!(data.skill(&rust.id).unwrap().level, 2);
        assert_eq!(data.skill(&sql.id).unwrap().level, 2);

        // Reopen and complete again: levels only go up on entering completed.
        toggle(&mut data, &p, 0);
        assert_eq!(data.skill(&rust.id).unwrap().level, 2);
        toggle(&mut data, &p, 0);
        assert_eq!(data.skill(&rust.id).unwrap().level, 3);
    }

    #[test]
    fn adding_feature_to_completed_project_reopens_it() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &["one"]);
        toggle(&mut data, &p, 0);
        let (out, _) = AddFeature {
            project_id: p.id.clone(),
            text: "two".into(),
        }
        .apply(&mut data)
        .unwrap();
        assert_eq!(out.project.progress, 50);
        assert_eq!(out.project.status, ProjectStatus::InProgress);
    }

    #[test]
    fn removing_last_open_feature_completes_project() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &["done", "dropped"]);
        toggle(&mut data, &p, 0);
        let (out, changes) = RemoveFeature {
            project_id: p.id.clone(),
            feature_id: p.features[1].id.clone(),
        }
        .apply(&mut data)
        .unwrap();
        assert_eq!(out.project.status, ProjectStatus::Completed);
        assert_eq!(out.project.features.len(), 1);
        assert!(matches!(changes[0], Change::DeleteFeature { .. }));
    }

    #[test]
    fn removing_first_feature_renumbers_rest() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &["a", "b", "c"]);
        let (out, _) = RemoveFeature {
            project_id: p.id.clone(),
            feature_id: p.features[0].id.clone(),
        }
        .apply(&mut data)
        .unwrap();
        let orders: Vec<u32> = out.project.features.iter().map(|f| f.sort_order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn reorder_features_splices() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &["a", "b", "c"]);
        let (out, _) = ReorderFeatures {
            project_id: p.id.clone(),
            from: 0,
            to: 2,
        }
        .apply(&mut data)
        .unwrap();
        let texts: Vec<&str> = out.features.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "a"]);
        assert_eq!(out.features[2].sort_order, 2);
    }

    #[test]
    fn toggle_unknown_feature_fails() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &["a"]);
        let err = ToggleFeature {
            project_id: p.id,
            feature_id: "nope".into(),
        }
        .apply(&mut data)
        .unwrap_err();
        assert!(matches!(err, crate::JourneyError::FeatureNotFound(_)));
    }

    #[test]
    fn blank_feature_text_rejected() {
        let mut data = Snapshot::default();
        let p = project(&mut data, &[]);
        assert!(AddFeature {
            project_id: p.id,
            text: "  ".into(),
        }
        .apply(&mut data)
        .is_err());
    }
}
