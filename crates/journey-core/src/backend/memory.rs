use super::Backend;
use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::snapshot::Snapshot;

/// Volatile backend. Holds the last persisted state so a reopened store over
/// the same instance sees it; nothing touches disk.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stored: Snapshot,
    fail_next: bool,
}

impl MemoryBackend {
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            stored: snapshot,
            fail_next: false,
        }
    }

    /// Make the next `persist` call fail. Used to exercise rollback.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    pub fn stored(&self) -> &Snapshot {
        &self.stored
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> Result<Snapshot> {
        Ok(self.stored.clone())
    }

    fn persist(&mut self, changes: &[Change], _after: &Snapshot) -> Result<()> {
        if std::mem::take(&mut self.fail_next) {
            return Err(JourneyError::Backend("injected failure".to_string()));
        }
        for change in changes {
            change.apply_to(&mut self.stored);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::Skill;

    #[test]
    fn persist_applies_changes() {
        let mut backend = MemoryBackend::default();
        let skill = Skill::new("Go");
        backend
            .persist(&[Change::PutSkill { skill: skill.clone() }], &Snapshot::default())
            .unwrap();
        assert_eq!(backend.load().unwrap().skills, vec![skill]);
    }

    #[test]
    fn injected_failure_fires_once() {
        let mut backend = MemoryBackend::default();
        backend.fail_next();
        let change = Change::PutSkill {
            skill: Skill::new("Go"),
        };
        assert!(backend
            .persist(std::slice::from_ref(&change), &Snapshot::default())
            .is_err());
        assert!(backend.stored().skills.is_empty());
        backend.persist(&[change], &Snapshot::default()).unwrap();
        assert_eq!(backend.stored().skills.len(), 1);
    }
}
