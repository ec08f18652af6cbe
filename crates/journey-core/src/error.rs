use thiserror::Error;

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("not initialized: run 'journey init'")]
    NotInitialized,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("skill not found: {0}")]
    SkillNotFound(String),

    #[error("skill already exists: {0}")]
    SkillExists(String),

    #[error("idea not found: {0}")]
    IdeaNotFound(String),

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("invalid skill level {0}: levels start at 1")]
    InvalidLevel(u32),

    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl JourneyError {
    /// True for lookups that found no record.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            JourneyError::ProjectNotFound(_)
                | JourneyError::FeatureNotFound(_)
                | JourneyError::SkillNotFound(_)
                | JourneyError::IdeaNotFound(_)
                | JourneyError::NoteNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, JourneyError>;
