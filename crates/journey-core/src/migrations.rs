//! Upgrades for records written by earlier data layouts.
//!
//! Older key-value entries stored projects without a status and with
//! `details: [{ text, completed }]` instead of features, ideas without
//! timestamps, and notes as bare strings. Each upgrade works on raw JSON so
//! that both layouts load into the current types.

use crate::idea::Idea;
use crate::note::Note;
use crate::project::Project;
use crate::skill::Skill;
use crate::types::ProjectStatus;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

pub fn upgrade_projects(raw: Value) -> Vec<Project> {
    let mut projects = Vec::new();
    for (i, item) in as_array(raw).into_iter().enumerate() {
        let Value::Object(mut obj) = item else {
            continue;
        };
        let id = ensure_id(&mut obj);
        stamp(&mut obj, &["created_at", "updated_at"]);
        obj.entry("sort_order").or_insert_with(|| json!(i));
        obj.entry("description").or_insert_with(|| json!(""));

        if !obj.contains_key("features") {
            if let Some(details) = obj.remove("details") {
                obj.insert("features".into(), details);
            }
        }
        if let Some(Value::Array(features)) = obj.get_mut("features") {
            for (pos, f) in features.iter_mut().enumerate() {
                if let Value::Object(f) = f {
                    ensure_id(f);
                    f.entry("project_id").or_insert_with(|| json!(id));
                    f.entry("sort_order").or_insert_with(|| json!(pos));
                }
            }
        }

        let legacy_progress = obj.get("progress").and_then(Value::as_u64).unwrap_or(0);
        let had_status = obj.contains_key("status");
        let Some(mut project) = decode::<Project>("project", obj) else {
            continue;
        };
        if !had_status {
            project.status = if legacy_progress >= 100 {
                ProjectStatus::Completed
            } else {
                ProjectStatus::InProgress
            };
        }
        if project.features.is_empty() {
            project.progress = legacy_progress.min(100) as u8;
        } else {
            project.refresh_progress();
        }
        projects.push(project);
    }
    projects
}

pub fn upgrade_ideas(raw: Value) -> Vec<Idea> {
    let mut ideas = Vec::new();
    for (i, item) in as_array(raw).into_iter().enumerate() {
        let Value::Object(mut obj) = item else {
            continue;
        };
        ensure_id(&mut obj);
        stamp(&mut obj, &["created_at"]);
        obj.entry("sort_order").or_insert_with(|| json!(i));
        ideas.extend(decode("idea", obj));
    }
    ideas
}

pub fn upgrade_notes(raw: Value) -> Vec<Note> {
    let mut notes = Vec::new();
    for item in as_array(raw) {
        match item {
            Value::String(text) => match Note::new(&text) {
                Ok(n) => notes.push(n),
                Err(_) => continue,
            },
            Value::Object(mut obj) => {
                ensure_id(&mut obj);
                stamp(&mut obj, &["timestamp"]);
                notes.extend(decode("note", obj));
            }
            _ => continue,
        }
    }
    notes
}

pub fn upgrade_skills(raw: Value) -> Vec<Skill> {
    let mut skills = Vec::new();
    for item in as_array(raw) {
        let Value::Object(mut obj) = item else {
            continue;
        };
        ensure_id(&mut obj);
        stamp(&mut obj, &["created_at"]);
        skills.extend(decode("skill", obj));
    }
    skills
}

fn as_array(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(kind = ?other, "expected a JSON array, ignoring entry");
            Vec::new()
        }
    }
}

/// Deserialize one upgraded record. A record that still does not fit is
/// logged and skipped so the rest of the collection loads.
fn decode<T: DeserializeOwned>(kind: &'static str, obj: Map<String, Value>) -> Option<T> {
    let id = obj.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value(Value::Object(obj)) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::error!(kind, id = %id, error = %e, "skipping unreadable record");
            None
        }
    }
}

fn ensure_id(obj: &mut Map<String, Value>) -> String {
    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    obj.insert("id".into(), json!(id));
    id
}

fn stamp(obj: &mut Map<String, Value>, fields: &[&str]) {
    let now = json!(Utc::now());
    for &f in fields {
        obj.entry(f).or_insert_with(|| now.clone());
    }
}
