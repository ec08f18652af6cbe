use crate::cmd::open_store;
use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum NoteSubcommand {
    /// Write a note
    Add { text: String },
    /// List notes, oldest first
    List,
    /// Replace the text of a note
    Edit { id: String, text: String },
    /// Delete a note
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: NoteSubcommand, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(root)?;
    match subcmd {
        NoteSubcommand::List => {
            if json {
                return print_json(&store.notes());
            }
            if store.notes().is_empty() {
                println!("No notes.");
                return Ok(());
            }
            let rows = store
                .notes()
                .iter()
                .map(|n| {
                    vec![
                        n.id.clone(),
                        n.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                        first_line(&n.text),
                    ]
                })
                .collect();
            print_table(&["ID", "WHEN", "NOTE"], rows);
            Ok(())
        }
        NoteSubcommand::Add { text } => {
            let n = store.add_note(&text).context("failed to add note")?;
            if json {
                return print_json(&n);
            }
            println!("Saved note {}.", n.id);
            Ok(())
        }
        NoteSubcommand::Edit { id, text } => {
            let n = store
                .update_note(&id, &text)
                .with_context(|| format!("failed to edit note '{id}'"))?;
            if json {
                return print_json(&n);
            }
            println!("Updated note {}.", n.id);
            Ok(())
        }
        NoteSubcommand::Remove { id } => {
            let n = store
                .remove_note(&id)
                .with_context(|| format!("failed to remove note '{id}'"))?;
            if json {
                return print_json(&serde_json::json!({ "removed": n.id }));
            }
            println!("Removed note {}.", n.id);
            Ok(())
        }
    }
}

fn first_line(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > 60 {
        let cut: String = line.chars().take(57).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
