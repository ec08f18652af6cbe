use crate::cmd::open_store;
use crate::output::{print_json, print_table, progress_bar};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum SkillSubcommand {
    /// Create a skill at level 1
    Add { name: String },
    /// List skills with their levels
    List,
    /// Rename a skill or set its level
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        level: Option<u32>,
    },
    /// Put a skill back to level 1
    Reset { id: String },
    /// Delete a skill and unlink it from every project
    Remove { id: String },
    /// Link a skill to a project
    Link { project: String, skill: String },
    /// Unlink a skill from a project
    Unlink { project: String, skill: String },
}

pub fn run(root: &Path, subcmd: SkillSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SkillSubcommand::List => list(root, json),
        SkillSubcommand::Add { name } => {
            let mut store = open_store(root)?;
            let s = store
                .add_skill(&name)
                .with_context(|| format!("failed to add skill '{name}'"))?;
            if json {
                return print_json(&s);
            }
            println!("Created skill '{}' ({}).", s.name, s.id);
            Ok(())
        }
        SkillSubcommand::Edit { id, name, level } => {
            let mut store = open_store(root)?;
            let s = store
                .update_skill(&id, name, level)
                .with_context(|| format!("failed to edit skill '{id}'"))?;
            if json {
                return print_json(&s);
            }
            println!("Skill '{}' is level {}.", s.name, s.level);
            Ok(())
        }
        SkillSubcommand::Reset { id } => {
            let mut store = open_store(root)?;
            let s = store
                .reset_skill(&id)
                .with_context(|| format!("failed to reset skill '{id}'"))?;
            if json {
                return print_json(&s);
            }
            println!("Skill '{}' reset to level {}.", s.name, s.level);
            Ok(())
        }
        SkillSubcommand::Remove { id } => {
            let mut store = open_store(root)?;
            let s = store
                .remove_skill(&id)
                .with_context(|| format!("failed to remove skill '{id}'"))?;
            if json {
                return print_json(&serde_json::json!({ "removed": s.id }));
            }
            println!("Removed skill '{}'.", s.name);
            Ok(())
        }
        SkillSubcommand::Link { project, skill } => {
            let mut store = open_store(root)?;
            let p = store
                .associate_skill(&project, &skill)
                .with_context(|| format!("failed to link skill '{skill}'"))?;
            links(&p.id, &p.associated_skills, json)
        }
        SkillSubcommand::Unlink { project, skill } => {
            let mut store = open_store(root)?;
            let p = store
                .dissociate_skill(&project, &skill)
                .with_context(|| format!("failed to unlink skill '{skill}'"))?;
            links(&p.id, &p.associated_skills, json)
        }
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    if json {
        return print_json(&store.skills());
    }
    if store.skills().is_empty() {
        println!("No skills.");
        return Ok(());
    }

    let max = store.config().skills.max_level;
    let rows = store
        .skills()
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.name.clone(),
                s.level.to_string(),
                progress_bar(s.progress_percent(max)),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "LEVEL", "PROGRESS"], rows);
    Ok(())
}

fn links(project_id: &str, skills: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "id": project_id,
            "associated_skills": skills,
        }));
    }
    if skills.is_empty() {
        println!("{project_id}: no linked skills");
    } else {
        println!("{project_id}: {}", skills.join(", "));
    }
    Ok(())
}
