use crate::backend::{self, Backend};
use crate::change::Change;
use crate::config::Config;
use crate::error::Result;
use crate::idea::Idea;
use crate::journey::{self, JourneySummary};
use crate::mutation::*;
use crate::note::Note;
use crate::project::Project;
use crate::skill::Skill;
use crate::snapshot::{self, Snapshot};
use crate::types::ProjectStatus;
use std::path::Path;
use std::time::SystemTime;

/// In-memory journey state backed by a persistence adapter.
///
/// All writes go through [`Store::execute`]: the command edits memory, the
/// backend persists the resulting rows, and any failure along the way puts
/// memory back exactly as it was.
pub struct Store {
    data: Snapshot,
    backend: Box<dyn Backend>,
    config: Config,
}

impl Store {
    /// Load `.journey/config.yaml` under `root` and open the configured backend.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)?;
        for w in config.validate() {
            tracing::warn!(level = ?w.level, "config: {}", w.message);
        }
        let backend = backend::open(root, &config)?;
        Self::with_backend(backend, config)
    }

    pub fn with_backend(backend: Box<dyn Backend>, config: Config) -> Result<Self> {
        let data = backend.load()?;
        tracing::debug!(
            backend = backend.name(),
            projects = data.projects.len(),
            skills = data.skills.len(),
            ideas = data.ideas.len(),
            notes = data.notes.len(),
            "loaded journey"
        );
        Ok(Self {
            data,
            backend,
            config,
        })
    }

    /// Run `mutation`, persist its changes, and roll memory back on failure.
    pub fn execute<M: Mutation>(&mut self, mutation: M) -> Result<(M::Output, Vec<Change>)> {
        let before = self.data.clone();
        let op = format!("{mutation:?}");

        let result = mutation.apply(&mut self.data).and_then(|(output, changes)| {
            self.data.normalize();
            self.backend.persist(&changes, &self.data)?;
            Ok((output, changes))
        });

        match &result {
            Ok((_, changes)) => tracing::debug!(%op, changes = changes.len(), "applied mutation"),
            Err(e) => {
                self.data = before;
                tracing::warn!(%op, error = %e, "mutation rolled back");
            }
        }
        result
    }

    fn run<M: Mutation>(&mut self, mutation: M) -> Result<M::Output> {
        self.execute(mutation).map(|(output, _)| output)
    }

    // ---------------------------------------------------------------------------
    // Sync
    // ---------------------------------------------------------------------------

    /// Reload from the backend and return the row changes that differ from
    /// what was in memory.
    pub fn refetch(&mut self) -> Result<Vec<Change>> {
        let fresh = self.backend.load()?;
        let changes = snapshot::diff(&self.data, &fresh);
        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "refetched journey");
        }
        self.data = fresh;
        Ok(changes)
    }

    /// Apply a change pushed from elsewhere without persisting it.
    pub fn reconcile(&mut self, change: &Change) {
        change.apply_to(&mut self.data);
    }

    // ---------------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------------

    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.backend.modified()
    }

    pub fn projects(&self) -> &[Project] {
        &self.data.projects
    }

    pub fn projects_by_status(&self, status: ProjectStatus) -> Vec<&Project> {
        self.data.projects_by_status(status)
    }

    pub fn project(&self, id: &str) -> Result<&Project> {
        self.data.project(id)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.data.skills
    }

    pub fn skill(&self, id: &str) -> Result<&Skill> {
        self.data.skill(id)
    }

    pub fn ideas(&self) -> &[Idea] {
        &self.data.ideas
    }

    pub fn notes(&self) -> &[Note] {
        &self.data.notes
    }

    pub fn journey_summary(&self) -> JourneySummary {
        journey::summarize(&self.data.projects)
    }

    // ---------------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------------

    pub fn add_project(&mut self, project: AddProject) -> Result<Project> {
        self.run(project)
    }

    pub fn update_project(
        &mut self,
        id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Project> {
        self.run(UpdateProject {
            id: id.to_string(),
            title,
            description,
        })
    }

    pub fn remove_project(&mut self, id: &str) -> Result<Project> {
        self.run(RemoveProject { id: id.to_string() })
    }

    pub fn move_project(&mut self, id: &str, status: ProjectStatus) -> Result<MoveOutcome> {
        self.run(MoveProject {
            id: id.to_string(),
            status,
        })
    }

    pub fn clear_projects(&mut self) -> Result<usize> {
        self.run(ClearProjects)
    }

    pub fn reorder_projects(
        &mut self,
        status: ProjectStatus,
        from: usize,
        to: usize,
    ) -> Result<Vec<Project>> {
        self.run(ReorderProjects { status, from, to })
    }

    // ---------------------------------------------------------------------------
    // Features
    // ---------------------------------------------------------------------------

    pub fn add_feature(&mut self, project_id: &str, text: &str) -> Result<FeatureOutcome> {
        self.run(AddFeature {
            project_id: project_id.to_string(),
            text: text.to_string(),
        })
    }

    pub fn toggle_feature(&mut self, project_id: &str, feature_id: &str) -> Result<FeatureOutcome> {
        self.run(ToggleFeature {
            project_id: project_id.to_string(),
            feature_id: feature_id.to_string(),
        })
    }

    pub fn update_feature(
        &mut self,
        project_id: &str,
        feature_id: &str,
        text: &str,
    ) -> Result<FeatureOutcome> {
        self.run(UpdateFeature {
            project_id: project_id.to_string(),
            feature_id: feature_id.to_string(),
            text: text.to_string(),
        })
    }

    pub fn remove_feature(&mut self, project_id: &str, feature_id: &str) -> Result<FeatureOutcome> {
        self.run(RemoveFeature {
            project_id: project_id.to_string(),
            feature_id: feature_id.to_string(),
        })
    }

    pub fn reorder_features(&mut self, project_id: &str, from: usize, to: usize) -> Result<Project> {
        self.run(ReorderFeatures {
            project_id: project_id.to_string(),
            from,
            to,
        })
    }

    // ---------------------------------------------------------------------------
    // Skills
    // ---------------------------------------------------------------------------

    pub fn add_skill(&mut self, name: &str) -> Result<Skill> {
        self.run(AddSkill {
            name: name.to_string(),
        })
    }

    pub fn update_skill(
        &mut self,
        id: &str,
        name: Option<String>,
        level: Option<u32>,
    ) -> Result<Skill> {
        self.run(UpdateSkill {
            id: id.to_string(),
            name,
            level,
        })
    }

    pub fn reset_skill(&mut self, id: &str) -> Result<Skill> {
        self.run(ResetSkill { id: id.to_string() })
    }

    pub fn remove_skill(&mut self, id: &str) -> Result<Skill> {
        self.run(RemoveSkill { id: id.to_string() })
    }

    pub fn associate_skill(&mut self, project_id: &str, skill_id: &str) -> Result<Project> {
        self.run(AssociateSkill {
            project_id: project_id.to_string(),
            skill_id: skill_id.to_string(),
        })
    }

    pub fn dissociate_skill(&mut self, project_id: &str, skill_id: &str) -> Result<Project> {
        self.run(DissociateSkill {
            project_id: project_id.to_string(),
            skill_id: skill_id.to_string(),
        })
    }

    // ---------------------------------------------------------------------------
    // Ideas
    // ---------------------------------------------------------------------------

    pub fn add_idea(&mut self, title: &str, description: &str) -> Result<Idea> {
        self.run(AddIdea {
            title: title.to_string(),
            description: description.to_string(),
        })
    }

    pub fn update_idea(
        &mut self,
        id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Idea> {
        self.run(UpdateIdea {
            id: id.to_string(),
            title,
            description,
        })
    }

    pub fn remove_idea(&mut self, id: &str) -> Result<Idea> {
        self.run(RemoveIdea { id: id.to_string() })
    }

    pub fn add_idea_detail(&mut self, id: &str, detail: &str) -> Result<Idea> {
        self.run(AddIdeaDetail {
            id: id.to_string(),
            detail: detail.to_string(),
        })
    }

    pub fn reorder_ideas(&mut self, from: usize, to: usize) -> Result<Vec<Idea>> {
        self.run(ReorderIdeas { from, to })
    }

    pub fn promote_idea(&mut self, id: &str) -> Result<Project> {
        self.run(PromoteIdea { id: id.to_string() })
    }

    // ---------------------------------------------------------------------------
    // Notes
    // ---------------------------------------------------------------------------

    pub fn add_note(&mut self, text: &str) -> Result<Note> {
        self.run(AddNote {
            text: text.to_string(),
        })
    }

    pub fn update_note(&mut self, id: &str, text: &str) -> Result<Note> {
        self.run(UpdateNote {
            id: id.to_string(),
            text: text.to_string(),
        })
    }

    pub fn remove_note(&mut self, id: &str) -> Result<Note> {
        self.run(RemoveNote { id: id.to_string() })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
