use crate::error::{JourneyError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freeform brainstorming note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Note {
    pub fn new(text: &str) -> Result<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: clean_text(text)?,
            timestamp: Utc::now(),
        })
    }
}

pub fn clean_text(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(JourneyError::EmptyField("note text"));
    }
    Ok(text.to_string())
}
