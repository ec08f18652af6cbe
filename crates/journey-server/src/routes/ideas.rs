use axum::extract::{Path, State};
use axum::Json;
use journey_core::mutation::{
    AddIdea, AddIdeaDetail, PromoteIdea, RemoveIdea, ReorderIdeas, UpdateIdea,
};
use serde::Deserialize;

use super::OrderBody;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ideas
pub async fn list_ideas(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let ideas = app.read(|store| Ok(store.ideas().to_vec())).await?;
    Ok(Json(serde_json::to_value(ideas)?))
}

#[derive(Debug, Deserialize)]
pub struct CreateIdeaBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// POST /api/ideas
pub async fn create_idea(
    State(app): State<AppState>,
    Json(body): Json<CreateIdeaBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let idea = app
        .mutate(AddIdea {
            title: body.title,
            description: body.description,
        })
        .await?;
    Ok(Json(serde_json::to_value(idea)?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateIdeaBody {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PUT /api/ideas/{id}
pub async fn update_idea(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateIdeaBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let idea = app
        .mutate(UpdateIdea {
            id,
            title: body.title,
            description: body.description,
        })
        .await?;
    Ok(Json(serde_json::to_value(idea)?))
}

/// DELETE /api/ideas/{id}
pub async fn delete_idea(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let idea = app.mutate(RemoveIdea { id }).await?;
    Ok(Json(serde_json::json!({ "removed": idea.id })))
}

#[derive(Debug, Deserialize)]
pub struct DetailBody {
    pub detail: String,
}

/// POST /api/ideas/{id}/details
pub async fn add_detail(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DetailBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let idea = app
        .mutate(AddIdeaDetail {
            id,
            detail: body.detail,
        })
        .await?;
    Ok(Json(serde_json::to_value(idea)?))
}

/// PUT /api/ideas/order
pub async fn reorder_ideas(
    State(app): State<AppState>,
    Json(body): Json<OrderBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ideas = app
        .mutate(ReorderIdeas {
            from: body.from,
            to: body.to,
        })
        .await?;
    let ids: Vec<&str> = ideas.iter().map(|i| i.id.as_str()).collect();
    Ok(Json(serde_json::json!({ "order": ids })))
}

/// POST /api/ideas/{id}/promote: turn the idea into an in-progress project.
pub async fn promote_idea(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let project = app.mutate(PromoteIdea { id }).await?;
    Ok(Json(serde_json::to_value(project)?))
}
