use super::Mutation;
use crate::change::Change;
use crate::error::{JourneyError, Result};
use crate::project::Project;
use crate::skill::{self, Skill};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct AddSkill {
    pub name: String,
}

impl Mutation for AddSkill {
    type Output = Skill;

    fn apply(self, data: &mut Snapshot) -> Result<(Skill, Vec<Change>)> {
        let name = skill::validate_name(&data.skills, &self.name, None)?;
        let skill = Skill::new(name);
        data.skills.push(skill.clone());
        Ok((skill.clone(), vec![Change::PutSkill { skill }]))
    }
}

/// Explicit edit of a skill's name and/or level.
#[derive(Debug, Clone, Default)]
pub struct UpdateSkill {
    pub id: String,
    pub name: Option<String>,
    pub level: Option<u32>,
}

impl Mutation for UpdateSkill {
    type Output = Skill;

    fn apply(self, data: &mut Snapshot) -> Result<(Skill, Vec<Change>)> {
        let name = self
            .name
            .as_deref()
            .map(|n| skill::validate_name(&data.skills, n, Some(&self.id)))
            .transpose()?;
        let skill = data.skill_mut(&self.id)?;
        if let Some(level) = self.level {
            skill.set_level(level)?;
        }
        if let Some(n) = name {
            skill.name = n;
        }
        Ok((skill.clone(), vec![Change::PutSkill { skill: skill.clone() }]))
    }
}

#[derive(Debug, Clone)]
pub struct ResetSkill {
    pub id: String,
}

impl Mutation for ResetSkill {
    type Output = Skill;

    fn apply(self, data: &mut Snapshot) -> Result<(Skill, Vec<Change>)> {
        let skill = data.skill_mut(&self.id)?;
        skill.reset();
        Ok((skill.clone(), vec![Change::PutSkill { skill: skill.clone() }]))
    }
}

/// Delete a skill and unlink it from every project that references it.
#[derive(Debug, Clone)]
pub struct RemoveSkill {
    pub id: String,
}

impl Mutation for RemoveSkill {
    type Output = Skill;

    fn apply(self, data: &mut Snapshot) -> Result<(Skill, Vec<Change>)> {
        let pos = data
            .skills
            .iter()
            .position(|s| s.id == self.id)
            .ok_or_else(|| JourneyError::SkillNotFound(self.id.clone()))?;
        let removed = data.skills.remove(pos);

        let mut changes = Vec::new();
        for project in data
            .projects
            .iter_mut()
            .filter(|p| p.associated_skills.contains(&self.id))
        {
            project.associated_skills.retain(|s| s != &self.id);
            project.touch();
            changes.push(Change::put_project(project));
        }
        changes.push(Change::DeleteSkill { id: self.id });
        Ok((removed, changes))
    }
}

/// Append a skill id to a project's associations. Repeated links are kept;
/// leveling counts each distinct skill once.
#[derive(Debug, Clone)]
pub struct AssociateSkill {
    pub project_id: String,
    pub skill_id: String,
}

impl Mutation for AssociateSkill {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        data.skill(&self.skill_id)?;
        let project = data.project_mut(&self.project_id)?;
        project.associated_skills.push(self.skill_id);
        project.touch();
        Ok((project.clone(), vec![Change::put_project(project)]))
    }
}

/// Remove every link between a project and a skill.
#[derive(Debug, Clone)]
pub struct DissociateSkill {
    pub project_id: String,
    pub skill_id: String,
}

impl Mutation for DissociateSkill {
    type Output = Project;

    fn apply(self, data: &mut Snapshot) -> Result<(Project, Vec<Change>)> {
        let project = data.project_mut(&self.project_id)?;
        let before = project.associated_skills.len();
        project.associated_skills.retain(|s| s != &self.skill_id);
        if project.associated_skills.len() == before {
            return Ok((project.clone(), Vec::new()));
        }
        project.touch();
        Ok((project.clone(), vec![Change::put_project(project)]))
    }
}
