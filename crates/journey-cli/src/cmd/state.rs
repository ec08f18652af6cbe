use crate::cmd::open_store;
use crate::output::{print_json, print_table};
use journey_core::types::ProjectStatus;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;

    if json {
        print_json(&serde_json::json!({
            "name": store.config().name,
            "backend": store.backend_name(),
            "projects": store.projects(),
            "skills": store.skills(),
            "ideas": store.ideas(),
            "notes": store.notes(),
        }))?;
        return Ok(());
    }

    println!("Journey: {} ({} backend)", store.config().name, store.backend_name());
    println!();
    let mut rows: Vec<Vec<String>> = ProjectStatus::all()
        .iter()
        .map(|&s| {
            vec![
                format!("projects: {s}"),
                store.projects_by_status(s).len().to_string(),
            ]
        })
        .collect();
    rows.push(vec!["skills".into(), store.skills().len().to_string()]);
    rows.push(vec!["ideas".into(), store.ideas().len().to_string()]);
    rows.push(vec!["notes".into(), store.notes().len().to_string()]);
    print_table(&["COLLECTION", "COUNT"], rows);
    Ok(())
}
