use crate::cmd::{open_store, parse_status};
use crate::output::{print_json, print_table, progress_bar};
use anyhow::Context;
use clap::Subcommand;
use journey_core::mutation::AddProject;
use journey_core::project::{self, Project};
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a project
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// idea, in_progress or completed
        #[arg(long, default_value = "in_progress")]
        status: String,
        /// Initial features (repeatable: --feature lexer --feature parser)
        #[arg(long = "feature")]
        features: Vec<String>,
        /// Skill ids to link (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
    /// List projects
    List {
        /// Only this status
        #[arg(long)]
        status: Option<String>,
    },
    /// Show a project and its features
    Show { id: String },
    /// Edit title or description
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project and its features
    Remove { id: String },
    /// Move a project to another status
    Move { id: String, status: String },
    /// Delete every project
    Clear,
    /// Move the project at FROM to TO within one status bucket
    Reorder {
        #[arg(long)]
        status: String,
        from: usize,
        to: usize,
    },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Add {
            title,
            description,
            status,
            features,
            skills,
        } => {
            let status = parse_status(&status)?;
            let mut store = open_store(root)?;
            let p = store
                .add_project(AddProject {
                    title,
                    description,
                    status,
                    features,
                    skills,
                })
                .context("failed to add project")?;
            if json {
                return print_json(&p);
            }
            println!("Created project '{}' [{}] ({}).", p.title, p.status, p.id);
            Ok(())
        }
        ProjectSubcommand::List { status } => list(root, status.as_deref(), json),
        ProjectSubcommand::Show { id } => show(root, &id, json),
        ProjectSubcommand::Update {
            id,
            title,
            description,
        } => {
            let mut store = open_store(root)?;
            let p = store
                .update_project(&id, title, description)
                .with_context(|| format!("failed to update project '{id}'"))?;
            if json {
                return print_json(&p);
            }
            println!("Updated project '{}'.", p.title);
            Ok(())
        }
        ProjectSubcommand::Remove { id } => {
            let mut store = open_store(root)?;
            let p = store
                .remove_project(&id)
                .with_context(|| format!("failed to remove project '{id}'"))?;
            if json {
                return print_json(&serde_json::json!({ "removed": p.id }));
            }
            println!(
                "Removed project '{}' and {} feature(s).",
                p.title,
                p.features.len()
            );
            Ok(())
        }
        ProjectSubcommand::Move { id, status } => {
            let status = parse_status(&status)?;
            let mut store = open_store(root)?;
            let outcome = store
                .move_project(&id, status)
                .with_context(|| format!("failed to move project '{id}'"))?;
            if json {
                return print_json(&outcome);
            }
            match outcome.status_change {
                Some(c) => println!("Moved '{}': {} -> {}.", outcome.project.title, c.from, c.to),
                None => println!("'{}' is already {}.", outcome.project.title, status),
            }
            for s in &outcome.leveled {
                println!("  {} leveled up to {}", s.name, s.level);
            }
            Ok(())
        }
        ProjectSubcommand::Clear => {
            let mut store = open_store(root)?;
            let removed = store.clear_projects().context("failed to clear projects")?;
            if json {
                return print_json(&serde_json::json!({ "removed": removed }));
            }
            println!("Removed {removed} project(s).");
            Ok(())
        }
        ProjectSubcommand::Reorder { status, from, to } => {
            let status = parse_status(&status)?;
            let mut store = open_store(root)?;
            let bucket = store
                .reorder_projects(status, from, to)
                .context("failed to reorder projects")?;
            if json {
                let ids: Vec<&str> = bucket.iter().map(|p| p.id.as_str()).collect();
                return print_json(&serde_json::json!({ "status": status, "order": ids }));
            }
            for (i, p) in bucket.iter().enumerate() {
                println!("{i}. {}", p.title);
            }
            Ok(())
        }
    }
}

fn list(root: &Path, status: Option<&str>, json: bool) -> anyhow::Result<()> {
    let status = status.map(parse_status).transpose()?;
    let store = open_store(root)?;
    let projects: Vec<&Project> = match status {
        Some(s) => store.projects_by_status(s),
        None => store.projects().iter().collect(),
    };

    if json {
        return print_json(&projects);
    }
    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let rows = projects
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.title.clone(),
                p.status.to_string(),
                progress_bar(p.progress),
                project::summarize(p),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "STATUS", "PROGRESS", "FEATURES"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    let p = store
        .project(id)
        .with_context(|| format!("project '{id}' not found"))?;

    if json {
        return print_json(p);
    }

    println!("{}  [{}]", p.title, p.status);
    if !p.description.is_empty() {
        println!("{}", p.description);
    }
    println!("Progress: {}", progress_bar(p.progress));

    let skills: Vec<&str> = p
        .distinct_skills()
        .iter()
        .filter_map(|sid| store.skill(sid).ok())
        .map(|s| s.name.as_str())
        .collect();
    if !skills.is_empty() {
        println!("Skills: {}", skills.join(", "));
    }

    if !p.features.is_empty() {
        println!();
        let rows = p
            .features
            .iter()
            .map(|f| {
                vec![
                    if f.completed { "[x]" } else { "[ ]" }.to_string(),
                    f.text.clone(),
                    f.id.clone(),
                ]
            })
            .collect();
        print_table(&["", "FEATURE", "ID"], rows);
    }
    Ok(())
}
