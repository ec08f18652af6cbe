use axum::extract::{Path, Query, State};
use axum::Json;
use journey_core::mutation::{
    AddProject, AssociateSkill, ClearProjects, DissociateSkill, MoveProject, RemoveProject,
    ReorderProjects, UpdateProject,
};
use journey_core::project;
use journey_core::types::ProjectStatus;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

fn parse_status(raw: &str) -> Result<ProjectStatus, AppError> {
    Ok(raw.parse::<ProjectStatus>()?)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// GET /api/projects: all projects, optionally one status bucket.
pub async fn list_projects(
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let list = app
        .read(move |store| {
            let list: Vec<serde_json::Value> = store
                .projects()
                .iter()
                .filter(|p| status.map_or(true, |s| p.status == s))
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "title": p.title,
                        "description": p.description,
                        "status": p.status,
                        "progress": p.progress,
                        "feature_summary": project::summarize(p),
                        "associated_skills": p.associated_skills,
                        "updated_at": p.updated_at,
                    })
                })
                .collect();
            Ok(serde_json::json!(list))
        })
        .await?;
    Ok(Json(list))
}

/// GET /api/projects/{id}: full project with features.
pub async fn get_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let p = app.read(move |store| store.project(&id).cloned()).await?;
    Ok(Json(serde_json::to_value(p)?))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// POST /api/projects
pub async fn create_project(
    State(app): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = body
        .status
        .as_deref()
        .map(parse_status)
        .transpose()?
        .unwrap_or_default();
    let p = app
        .mutate(AddProject {
            title: body.title,
            description: body.description,
            status,
            features: body.features,
            skills: body.skills,
        })
        .await?;
    Ok(Json(serde_json::to_value(p)?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectBody {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PUT /api/projects/{id}
pub async fn update_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateProjectBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let p = app
        .mutate(UpdateProject {
            id,
            title: body.title,
            description: body.description,
        })
        .await?;
    Ok(Json(serde_json::to_value(p)?))
}

/// DELETE /api/projects/{id}: removes the project and its features.
pub async fn delete_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let p = app.mutate(RemoveProject { id }).await?;
    Ok(Json(serde_json::json!({ "removed": p.id })))
}

/// DELETE /api/projects: removes every project.
pub async fn clear_projects(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = app.mutate(ClearProjects).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

#[derive(Debug, Deserialize)]
pub struct ReorderProjectsBody {
    pub status: String,
    pub from: usize,
    pub to: usize,
}

/// PUT /api/projects/order: reorder within one status bucket.
pub async fn reorder_projects(
    State(app): State<AppState>,
    Json(body): Json<ReorderProjectsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = parse_status(&body.status)?;
    let bucket = app
        .mutate(ReorderProjects {
            status,
            from: body.from,
            to: body.to,
        })
        .await?;
    let ids: Vec<&str> = bucket.iter().map(|p| p.id.as_str()).collect();
    Ok(Json(serde_json::json!({ "status": status, "order": ids })))
}

#[derive(Debug, Deserialize)]
pub struct MoveBody {
    pub status: String,
}

/// POST /api/projects/{id}/move: change status; completing levels skills.
pub async fn move_project(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MoveBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = parse_status(&body.status)?;
    let outcome = app.mutate(MoveProject { id, status }).await?;
    Ok(Json(serde_json::to_value(outcome)?))
}

#[derive(Debug, Deserialize)]
pub struct LinkSkillBody {
    pub skill_id: String,
}

/// POST /api/projects/{id}/skills
pub async fn link_skill(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<LinkSkillBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let p = app
        .mutate(AssociateSkill {
            project_id: id,
            skill_id: body.skill_id,
        })
        .await?;
    Ok(Json(serde_json::json!({
        "id": p.id,
        "associated_skills": p.associated_skills,
    })))
}

/// DELETE /api/projects/{id}/skills/{sid}
pub async fn unlink_skill(
    State(app): State<AppState>,
    Path((id, sid)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let p = app
        .mutate(DissociateSkill {
            project_id: id,
            skill_id: sid,
        })
        .await?;
    Ok(Json(serde_json::json!({
        "id": p.id,
        "associated_skills": p.associated_skills,
    })))
}

