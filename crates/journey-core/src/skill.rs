use crate::error::{JourneyError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub created_at: DateTime<Utc>,
}

fn default_level() -> u32 {
    1
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            level: default_level(),
            created_at: Utc::now(),
        }
    }

    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.level = default_level();
    }

    pub fn set_level(&mut self, level: u32) -> Result<()> {
        if level == 0 {
            return Err(JourneyError::InvalidLevel(level));
        }
        self.level = level;
        Ok(())
    }

    /// Level as a percentage of `max_level`, capped at 100.
    pub fn progress_percent(&self, max_level: u32) -> u8 {
        if max_level == 0 {
            return 100;
        }
        (u64::from(self.level.min(max_level)) * 100 / u64::from(max_level)) as u8
    }
}

/// Trim a skill name and check it is non-empty and not already taken
/// (case-insensitive). `except` skips the skill being renamed.
pub fn validate_name(skills: &[Skill], name: &str, except: Option<&str>) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(JourneyError::EmptyField("skill name"));
    }
    let taken = skills
        .iter()
        .filter(|s| Some(s.id.as_str()) != except)
        .any(|s| s.name.eq_ignore_ascii_case(name));
    if taken {
        return Err(JourneyError::SkillExists(name.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_skill_starts_at_level_one() {
        assert_eq!(Skill::new("Rust").level, 1);
    }

    #[test]
    fn level_zero_is_rejected() {
        let mut s = Skill::new("Rust");
        assert!(matches!(s.set_level(0), Err(JourneyError::InvalidLevel(0))));
        assert_eq!(s.level, 1);
    }

    #[test]
    fn reset_returns_to_one() {
        let mut s = Skill::new("Rust");
        s.level_up();
        s.level_up();
        s.reset();
        assert_eq!(s.level, 1);
    }

    #[test]
    fn progress_percent_is_capped() {
        let mut s = Skill::new("Rust");
        s.set_level(3).unwrap();
        assert_eq!(s.progress_percent(10), 30);
        s.set_level(15).unwrap();
        assert_eq!(s.progress_percent(10), 100);
    }

    #[test]
    fn progress_percent_handles_large_levels() {
        let mut s = Skill::new("Rust");
        s.set_level(u32::MAX).unwrap();
        assert_eq!(s.progress_percent(u32::MAX), 100);
        assert_eq!(s.progress_percent(100_000_000), 100);
        s.set_level(u32::MAX / 2).unwrap();
        assert_eq!(s.progress_percent(u32::MAX), 49);
        s.set_level(5).unwrap();
        assert_eq!(s.progress_percent(u32::MAX), 0);
    }

    #[test]
    fn duplicate_names_rejected_case_insensitively() {
        let skills = vec![Skill::new("Rust")];
        assert!(matches!(
            validate_name(&skills, "  rust ", None),
            Err(JourneyError::SkillExists(_))
        ));
        assert_eq!(validate_name(&skills, " Go ", None).unwrap(), "Go");
    }

    #[test]
    fn renaming_to_own_name_is_allowed() {
        let skills = vec![Skill::new("Rust")];
        let id = skills[0].id.clone();
        assert_eq!(validate_name(&skills, "RUST", Some(&id)).unwrap(), "RUST");
    }
}
