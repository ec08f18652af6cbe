use crate::cmd::open_store;
use crate::output::{print_json, print_table, progress_bar};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    let summary = store.journey_summary();

    if json {
        return print_json(&summary);
    }

    println!(
        "Level {}  ({} of {} projects completed)",
        summary.level, summary.completed, summary.total
    );
    if summary.breakdown.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }
    println!();
    let rows = summary
        .breakdown
        .iter()
        .map(|p| vec![p.title.clone(), p.status.to_string(), progress_bar(p.progress)])
        .collect();
    print_table(&["PROJECT", "STATUS", "PROGRESS"], rows);
    Ok(())
}
