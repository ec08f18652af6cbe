//! Prompt pass-through to the configured generation API.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
}

/// POST /api/v0: forward `{ prompt }` and return the upstream JSON verbatim.
///
/// The upstream status code is not surfaced; only transport failures and
/// non-JSON bodies turn into 502.
pub async fn generate(
    State(app): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Some(key) = app.generate.api_key() else {
        return Err(AppError::unavailable(format!(
            "generation API key not set; export {}",
            app.generate.api_key_env
        )));
    };

    let resp = app
        .http_client
        .post(&app.generate.endpoint)
        .bearer_auth(key)
        .json(&serde_json::json!({ "prompt": body.prompt }))
        .send()
        .await
        .map_err(|e| AppError::bad_gateway(format!("generation request failed: {e}")))?;

    let status = resp.status();
    let value: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| AppError::bad_gateway(format!("generation response was not JSON: {e}")))?;
    tracing::debug!(status = status.as_u16(), "generation response");
    Ok(Json(value))
}
