use crate::cmd::open_store;
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum IdeaSubcommand {
    /// Capture a new idea
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List ideas in order
    List,
    /// Append a feature note to an idea
    Detail { id: String, text: String },
    /// Edit title or description
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an idea
    Remove { id: String },
    /// Move the idea at FROM to TO
    Reorder { from: usize, to: usize },
    /// Turn an idea into an in-progress project
    Promote { id: String },
}

pub fn run(root: &Path, subcmd: IdeaSubcommand, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(root)?;
    match subcmd {
        IdeaSubcommand::List => {
            if json {
                return print_json(&store.ideas());
            }
            if store.ideas().is_empty() {
                println!("No ideas.");
                return Ok(());
            }
            let rows = store
                .ideas()
                .iter()
                .map(|i| vec![i.id.clone(), i.title.clone(), i.details.len().to_string()])
                .collect();
            print_table(&["ID", "TITLE", "DETAILS"], rows);
            Ok(())
        }
        IdeaSubcommand::Add { title, description } => {
            let idea = store
                .add_idea(&title, &description)
                .context("failed to add idea")?;
            if json {
                return print_json(&idea);
            }
            println!("Captured idea '{}' ({}).", idea.title, idea.id);
            Ok(())
        }
        IdeaSubcommand::Detail { id, text } => {
            let idea = store
                .add_idea_detail(&id, &text)
                .with_context(|| format!("failed to add detail to idea '{id}'"))?;
            if json {
                return print_json(&idea);
            }
            println!("'{}' now has {} detail(s).", idea.title, idea.details.len());
            Ok(())
        }
        IdeaSubcommand::Update {
            id,
            title,
            description,
        } => {
            let idea = store
                .update_idea(&id, title, description)
                .with_context(|| format!("failed to update idea '{id}'"))?;
            if json {
                return print_json(&idea);
            }
            println!("Updated idea '{}'.", idea.title);
            Ok(())
        }
        IdeaSubcommand::Remove { id } => {
            let idea = store
                .remove_idea(&id)
                .with_context(|| format!("failed to remove idea '{id}'"))?;
            if json {
                return print_json(&serde_json::json!({ "removed": idea.id }));
            }
            println!("Removed idea '{}'.", idea.title);
            Ok(())
        }
        IdeaSubcommand::Reorder { from, to } => {
            let ideas = store
                .reorder_ideas(from, to)
                .context("failed to reorder ideas")?;
            if json {
                let ids: Vec<&str> = ideas.iter().map(|i| i.id.as_str()).collect();
                return print_json(&serde_json::json!({ "order": ids }));
            }
            for (i, idea) in ideas.iter().enumerate() {
                println!("{i}. {}", idea.title);
            }
            Ok(())
        }
        IdeaSubcommand::Promote { id } => {
            let p = store
                .promote_idea(&id)
                .with_context(|| format!("failed to promote idea '{id}'"))?;
            if json {
                return print_json(&p);
            }
            println!(
                "Promoted to project '{}' [{}] with {} feature(s) ({}).",
                p.title,
                p.status,
                p.features.len(),
                p.id
            );
            Ok(())
        }
    }
}
