use crate::error::{JourneyError, Result};
use crate::types::ProjectStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// One checklist item of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub project_id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub sort_order: u32,
}

impl Feature {
    pub fn new(project_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            text: text.into(),
            completed: false,
            sort_order: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub associated_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A status change implied by a progress recomputation or an explicit move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub from: ProjectStatus,
    pub to: ProjectStatus,
}

impl StatusChange {
    pub fn entered_completed(&self) -> bool {
        self.to == ProjectStatus::Completed && self.from != ProjectStatus::Completed
    }
}

impl Project {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: ProjectStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            status,
            progress: 0,
            sort_order: 0,
            features: Vec::new(),
            associated_skills: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Append a feature and return its id. Progress is not recomputed here.
    pub fn push_feature(&mut self, text: impl Into<String>) -> String {
        let mut feature = Feature::new(self.id.clone(), text);
        feature.sort_order = self.features.len() as u32;
        let id = feature.id.clone();
        self.features.push(feature);
        id
    }

    pub fn feature(&self, feature_id: &str) -> Result<&Feature> {
        self.features
            .iter()
            .find(|f| f.id == feature_id)
            .ok_or_else(|| JourneyError::FeatureNotFound(feature_id.to_string()))
    }

    pub fn feature_mut(&mut self, feature_id: &str) -> Result<&mut Feature> {
        self.features
            .iter_mut()
            .find(|f| f.id == feature_id)
            .ok_or_else(|| JourneyError::FeatureNotFound(feature_id.to_string()))
    }

    /// Rewrite each feature's `sort_order` to its position.
    pub fn renumber_features(&mut self) {
        for (i, f) in self.features.iter_mut().enumerate() {
            f.sort_order = i as u32;
        }
    }

    /// Recompute progress from the feature list and apply the status it implies.
    ///
    /// A project with features that are all done becomes `completed`; a
    /// `completed` project with open features drops back to `in_progress`.
    /// Projects without features keep their status.
    pub fn refresh_progress(&mut self) -> Option<StatusChange> {
        self.progress = compute_progress(&self.features);
        if self.features.is_empty() {
            return None;
        }
        let target = match (self.progress, self.status) {
            (100, ProjectStatus::Completed) => return None,
            (100, _) => ProjectStatus::Completed,
            (_, ProjectStatus::Completed) => ProjectStatus::InProgress,
            _ => return None,
        };
        let change = StatusChange {
            from: self.status,
            to: target,
        };
        self.status = target;
        Some(change)
    }

    /// Distinct associated skill ids, in first-seen order.
    pub fn distinct_skills(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for id in &self.associated_skills {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// Copy of the project row with features stripped, as stored by
    /// relational backends.
    pub fn without_features(&self) -> Project {
        Project {
            features: Vec::new(),
            ..self.clone()
        }
    }

    pub fn completed_count(&self) -> usize {
        self.features.iter().filter(|f| f.completed).count()
    }
}

/// Completion percentage of a feature list, rounded half up. An empty list is 0.
pub fn compute_progress(features: &[Feature]) -> u8 {
    let total = features.len();
    if total == 0 {
        return 0;
    }
    let done = features.iter().filter(|f| f.completed).count();
    ((done * 100 + total / 2) / total) as u8
}

/// "2/3 features complete"
pub fn summarize(project: &Project) -> String {
    format!(
        "{}/{} features complete",
        project.completed_count(),
        project.features.len()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
