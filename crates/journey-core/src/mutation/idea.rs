use super::{next_project_order, required, Mutation};
use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::idea::Idea;
use crate::order;
use crate::project::Project;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct AddIdea {
    pub title: String,
    pub description: String,
}

impl Mutation for AddIdea {
    type Output = Idea;

    fn apply(self, data: &mut Snapshot) -> Result<(Idea, Vec<Change>)> {
        let title = required("idea title", &self.title)?;
        let mut idea = Idea::new(title, self.description.trim());
        idea.sort_order = data
            .ideas
            .iter()
            .map(|i| i.sort_order + 1)
            .max()
            .unwrap_or(0);
        data.ideas.push(idea.clone());
        Ok((idea.clone(), vec![Change::PutIdea { idea }]))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateIdea {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Mutation for UpdateIdea {
    type Output = Idea;

    fn apply(self, data: &mut Snapshot) -> Result<(Idea, Vec<Change>)> {
        let title = self
            .title
            .as_deref()
            .map(|t| required("idea title", t))
            .transpose()?;
        let idea = data.idea_mut(&self.id)?;
        if let Some(t) = title {
            idea.title = t;
        }
        if let Some(d) = self.description {
            idea.description = d.trim().to_string();
        }
        Ok((idea.clone(), vec![Change::PutIdea { idea: idea.clone() }]))
    }
}

#[derive(Debug, Clone)]
pub struct RemoveIdea {
    pub id: String,
}

impl Mutation for RemoveIdea {
    type Output = Idea;

    fn apply(self, data: &mut Snapshot) -> Result<(Idea, Vec<Change>)> {
        let pos = data
            .ideas
            .iter()
            .position(|i| i.id == self.id)
            .ok_or_else(|| JourneyError::IdeaNotFound(self.id.clone()))?;
        let idea = data.ideas.remove(pos);
        Ok((idea, vec![Change::DeleteIdea { id: self.id }]))
    }
}

/// Append a feature note to an idea.
#[derive(Debug, Clone)]
pub struct AddIdeaDetail {
    pub id: String,
    pub detail: String,
}

impl Mutation for AddIdeaDetail {
    type Output = Idea;

    fn apply(self, data: &mut Snapshot) -> Result<(Idea, Vec<Change>)> {
        let detail = required("idea detail", &self.detail)?;
        let idea = data.idea_mut(&self.id)?;
        idea.details.push(detail);
        Ok((idea.clone(), vec![Change::PutIdea { idea: idea.clone() }]))
    }
}

#[derive(Debug, Clone)]
pub struct ReorderIdeas {
    pub from: usize,
    pub to: usize,
}

impl Mutation for ReorderIdeas {
    type Output = Vec<Idea>;

    fn apply(self, data: &mut Snapshot) -> Result<(Vec<Idea>, Vec<Change>)> {
        order::reorder(&mut data.ideas, self.from, self.to)?;
        let mut changes = Vec::new();
        for (i, idea) in data.ideas.iter_mut().enumerate() {
            if idea.sort_order != i as u32 {
                idea.sort_order = i as u32;
                changes.push(Change::PutIdea { idea: idea.clone() });
            }
        }
        Ok((data.ideas.clone(), changes))
    }
}

/// Turn an idea into an in-progress project and drop the idea.
#[derive(Debug, Clone)]
pub struct PromoteIdea {
    pub id: String,
}

impl Mutation for PromoteIdea {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        let pos = data
            .ideas
            .iter()
            .position(|i| i.id == self.id)
            .ok_or_else(|| JourneyError::IdeaNotFound(self.id.clone()))?;
        let idea = data.ideas.remove(pos);

        let mut project = idea.to_project();
        project.sort_order = next_project_order(data);

        let mut changes = vec![Change::put_project(&project)];
        changes.extend(project.features.iter().map(|f| Change::PutFeature {
            feature: f.clone(),
        }));
        changes.push(Change::DeleteIdea { id: idea.id });
        data.projects.push(project.clone());
        Ok((project, changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectStatus;

    fn idea(data: &mut Snapshot, title: &str) -> Idea {
        AddIdea {
            title: title.into(),
            ..Default::default()
        }
        .apply(data)
        .unwrap()
        .0
    }

    #[test]
    fn idea_requires_title() {
        let mut data = Snapshot::default();
        assert!(AddIdea::default().apply(&mut data).is_err());
    }

    #[test]
    fn details_accumulate() {
        let mut data = Snapshot::default();
        let i = idea(&mut data, "Blog");
        for d in ["rss", "tags"] {
            AddIdeaDetail {
                id: i.id.clone(),
                detail: d.into(),
            }
            .apply(&mut data)
            .unwrap();
        }
        assert_eq!(data.ideas[0].details, vec!["rss", "tags"]);
    }

    #[test]
    fn reorder_ideas_renumbers() {
        let mut data = Snapshot::default();
        idea(&mut data, "a");
        idea(&mut data, "b");
        idea(&mut data, "c");
        let (ideas, changes) = ReorderIdeas { from: 2, to: 0 }.apply(&mut data).unwrap();
        let titles: Vec<&str> = ideas.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn promote_moves_idea_into_projects() {
        let mut data = Snapshot::default();
        let i = idea(&mut data, "Game");
        AddIdeaDetail {
            id: i.id.clone(),
            detail: "physics".into(),
        }
        .apply(&mut data)
        .unwrap();
        let (p, changes) = PromoteIdea { id: i.id.clone() }.apply(&mut data).unwrap();
        assert!(data.ideas.is_empty());
        assert_eq!(data.projects.len(), 1);
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!(p.features[0].text, "physics");
        assert!(matches!(changes.last(), Some(Change::DeleteIdea { id }) if *id == i.id));
    }
}
