use crate::project::Project;
use crate::types::ProjectStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A lightweight pre-project record: a title, a description and loose
/// feature notes that become checklist items once the idea is promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub sort_order: u32,
    pub created_at: DateTime<Utc>,
}

impl Idea {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            details: Vec::new(),
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    /// Build the in-progress project this idea turns into.
    pub fn to_project(&self) -> Project {
        let mut project = Project::new(
            self.title.clone(),
            self.description.clone(),
            ProjectStatus::InProgress,
        );
        for detail in &self.details {
            project.push_feature(detail.clone());
        }
        project.refresh_progress();
        project
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_carries_details_as_open_features() {
        let mut idea = Idea::new("Tracker", "track things");
        idea.details = vec!["store".into(), "cli".into()];
        let p = idea.to_project();
        assert_eq!(p.title, "Tracker");
        assert_eq!(p.status, ProjectStatus::InProgress);
        assert_eq!(p.features.len(), 2);
        assert!(p.features.iter().all(|f| !f.completed && f.project_id == p.id));
        assert_eq!(p.progress, 0);
    }
}
