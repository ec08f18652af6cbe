use axum::extract::{Path, State};
use axum::Json;
use journey_core::mutation::{AddNote, RemoveNote, UpdateNote};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/notes: oldest first.
pub async fn list_notes(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let notes = app.read(|store| Ok(store.notes().to_vec())).await?;
    Ok(Json(serde_json::to_value(notes)?))
}

#[derive(Debug, Deserialize)]
pub struct NoteBody {
    pub text: String,
}

/// POST /api/notes
pub async fn create_note(
    State(app): State<AppState>,
    Json(body): Json<NoteBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let note = app.mutate(AddNote { text: body.text }).await?;
    Ok(Json(serde_json::to_value(note)?))
}

/// PUT /api/notes/{id}
pub async fn update_note(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NoteBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let note = app.mutate(UpdateNote { id, text: body.text }).await?;
    Ok(Json(serde_json::to_value(note)?))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let note = app.mutate(RemoveNote { id }).await?;
    Ok(Json(serde_json::json!({ "removed": note.id })))
}
