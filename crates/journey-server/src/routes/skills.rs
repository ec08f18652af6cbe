use axum::extract::{Path, State};
use axum::Json;
use journey_core::mutation::{AddSkill, RemoveSkill, ResetSkill, UpdateSkill};
use journey_core::skill::Skill;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

fn skill_json(s: &Skill, max_level: u32) -> serde_json::Value {
    serde_json::json!({
        "id": s.id,
        "name": s.name,
        "level": s.level,
        "progress": s.progress_percent(max_level),
        "created_at": s.created_at,
    })
}

/// GET /api/skills: every skill with its progress towards `skills.max_level`.
pub async fn list_skills(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let list = app
        .read(|store| {
            let max = store.config().skills.max_level;
            let list: Vec<serde_json::Value> =
                store.skills().iter().map(|s| skill_json(s, max)).collect();
            Ok(serde_json::json!(list))
        })
        .await?;
    Ok(Json(list))
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillBody {
    pub name: String,
}

/// POST /api/skills
pub async fn create_skill(
    State(app): State<AppState>,
    Json(body): Json<CreateSkillBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let s = app.mutate(AddSkill { name: body.name }).await?;
    Ok(Json(serde_json::to_value(s)?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillBody {
    pub name: Option<String>,
    pub level: Option<u32>,
}

/// PUT /api/skills/{id}
pub async fn update_skill(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSkillBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let s = app
        .mutate(UpdateSkill {
            id,
            name: body.name,
            level: body.level,
        })
        .await?;
    Ok(Json(serde_json::to_value(s)?))
}

/// POST /api/skills/{id}/reset: back to level 1.
pub async fn reset_skill(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let s = app.mutate(ResetSkill { id }).await?;
    Ok(Json(serde_json::to_value(s)?))
}

/// DELETE /api/skills/{id}: also unlinks it from every project.
pub async fn delete_skill(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let s = app.mutate(RemoveSkill { id }).await?;
    Ok(Json(serde_json::json!({ "removed": s.id })))
}
