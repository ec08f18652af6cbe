use axum::extract::{Path, State};
use axum::Json;
use journey_core::mutation::{
    AddFeature, FeatureOutcome, RemoveFeature, ReorderFeatures, ToggleFeature, UpdateFeature,
};
use serde::Deserialize;

use super::OrderBody;
use crate::error::AppError;
use crate::state::AppState;

/// Project progress after a feature change, plus any status transition and
/// the skills it leveled.
fn outcome_json(o: FeatureOutcome) -> serde_json::Value {
    serde_json::json!({
        "project_id": o.project.id,
        "feature_id": o.feature_id,
        "progress": o.project.progress,
        "status": o.project.status,
        "features": o.project.features,
        "status_change": o.status_change,
        "leveled": o.leveled,
    })
}

#[derive(Debug, Deserialize)]
pub struct FeatureBody {
    pub text: String,
}

/// POST /api/projects/{id}/features
pub async fn add_feature(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FeatureBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let o = app
        .mutate(AddFeature {
            project_id: id,
            text: body.text,
        })
        .await?;
    Ok(Json(outcome_json(o)))
}

/// POST /api/projects/{id}/features/{fid}/toggle
pub async fn toggle_feature(
    State(app): State<AppState>,
    Path((id, fid)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let o = app
        .mutate(ToggleFeature {
            project_id: id,
            feature_id: fid,
        })
        .await?;
    Ok(Json(outcome_json(o)))
}

/// PUT /api/projects/{id}/features/{fid}
pub async fn update_feature(
    State(app): State<AppState>,
    Path((id, fid)): Path<(String, String)>,
    Json(body): Json<FeatureBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let o = app
        .mutate(UpdateFeature {
            project_id: id,
            feature_id: fid,
            text: body.text,
        })
        .await?;
    Ok(Json(outcome_json(o)))
}

/// DELETE /api/projects/{id}/features/{fid}
pub async fn delete_feature(
    State(app): State<AppState>,
    Path((id, fid)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let o = app
        .mutate(RemoveFeature {
            project_id: id,
            feature_id: fid,
        })
        .await?;
    Ok(Json(outcome_json(o)))
}

/// PUT /api/projects/{id}/features/order
pub async fn reorder_features(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<OrderBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let p = app
        .mutate(ReorderFeatures {
            project_id: id,
            from: body.from,
            to: body.to,
        })
        .await?;
    Ok(Json(serde_json::json!({
        "project_id": p.id,
        "features": p.features,
    })))
}
