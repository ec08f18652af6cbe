//! The learning-journey view: an overall level and per-project progress.

use crate::project::Project;
use crate::types::ProjectStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub id: String,
    pub title: String,
    pub status: ProjectStatus,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneySummary {
    /// Completed projects + 1.
    pub level: usize,
    pub completed: usize,
    pub total: usize,
    /// Every project, highest progress first.
    pub breakdown: Vec<ProjectProgress>,
}

pub fn summarize(projects: &[Project]) -> JourneySummary {
    let completed = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .count();
    let mut breakdown: Vec<ProjectProgress> = projects
        .iter()
        .map(|p| ProjectProgress {
            id: p.id.clone(),
            title: p.title.clone(),
            status: p.status,
            progress: p.progress,
        })
        .collect();
    breakdown.sort_by(|a, b| b.progress.cmp(&a.progress));
    JourneySummary {
        level: completed + 1,
        completed,
        total: projects.len(),
        breakdown,
    }
}
