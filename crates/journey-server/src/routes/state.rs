use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state: every collection plus the journey summary.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = app
        .read(|store| {
            Ok(serde_json::json!({
                "name": store.config().name,
                "backend": store.backend_name(),
                "projects": store.projects(),
                "skills": store.skills(),
                "ideas": store.ideas(),
                "notes": store.notes(),
                "journey": store.journey_summary(),
            }))
        })
        .await?;
    Ok(Json(result))
}

/// GET /api/journey: level, completion counts and per-project progress.
pub async fn get_journey(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let summary = app.read(|store| Ok(store.journey_summary())).await?;
    Ok(Json(serde_json::to_value(summary)?))
}
