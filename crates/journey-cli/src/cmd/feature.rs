use crate::cmd::open_store;
use crate::output::{print_json, progress_bar};
use anyhow::Context;
use clap::Subcommand;
use journey_core::mutation::FeatureOutcome;
use std::path::Path;

#[derive(Subcommand)]
pub enum FeatureSubcommand {
    /// Append a feature to a project
    Add { project: String, text: String },
    /// Flip a feature between done and not done
    Toggle { project: String, feature: String },
    /// Change the text of a feature
    Edit {
        project: String,
        feature: String,
        text: String,
    },
    /// Delete a feature
    Remove { project: String, feature: String },
    /// Move the feature at FROM to TO
    Reorder {
        project: String,
        from: usize,
        to: usize,
    },
}

pub fn run(root: &Path, subcmd: FeatureSubcommand, json: bool) -> anyhow::Result<()> {
    let mut store = open_store(root)?;
    match subcmd {
        FeatureSubcommand::Add { project, text } => {
            let o = store
                .add_feature(&project, &text)
                .with_context(|| format!("failed to add feature to '{project}'"))?;
            report(&o, "Added", json)
        }
        FeatureSubcommand::Toggle { project, feature } => {
            let o = store
                .toggle_feature(&project, &feature)
                .with_context(|| format!("failed to toggle feature '{feature}'"))?;
            report(&o, "Toggled", json)
        }
        FeatureSubcommand::Edit {
            project,
            feature,
            text,
        } => {
            let o = store
                .update_feature(&project, &feature, &text)
                .with_context(|| format!("failed to edit feature '{feature}'"))?;
            report(&o, "Edited", json)
        }
        FeatureSubcommand::Remove { project, feature } => {
            let o = store
                .remove_feature(&project, &feature)
                .with_context(|| format!("failed to remove feature '{feature}'"))?;
            report(&o, "Removed", json)
        }
        FeatureSubcommand::Reorder { project, from, to } => {
            let p = store
                .reorder_features(&project, from, to)
                .with_context(|| format!("failed to reorder features of '{project}'"))?;
            if json {
                return print_json(&p.features);
            }
            for (i, f) in p.features.iter().enumerate() {
                println!("{i}. {}", f.text);
            }
            Ok(())
        }
    }
}

fn report(o: &FeatureOutcome, verb: &str, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(o);
    }
    println!(
        "{verb} feature {} on '{}'. Progress {}",
        o.feature_id,
        o.project.title,
        progress_bar(o.project.progress)
    );
    if let Some(c) = o.status_change {
        println!("  status: {} -> {}", c.from, c.to);
    }
    for s in &o.leveled {
        println!("  {} leveled up to {}", s.name, s.level);
    }
    Ok(())
}
