use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use journey_core::error::JourneyError;

// ---------------------------------------------------------------------------
// Sentinels for statuses JourneyError has no variant for
// ---------------------------------------------------------------------------

/// The generation upstream could not be reached or answered garbage.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct BadGatewayError(String);

/// A dependency the request needs is not configured.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct UnavailableError(String);

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. The body is `{ "error": ... }`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 502 Bad Gateway.
    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self(BadGatewayError(msg.into()).into())
    }

    /// 503 Service Unavailable.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self(UnavailableError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadGatewayError>().is_some() {
            return StatusCode::BAD_GATEWAY;
        }
        if self.0.downcast_ref::<UnavailableError>().is_some() {
            return StatusCode::SERVICE_UNAVAILABLE;
        }
        let Some(e) = self.0.downcast_ref::<JourneyError>() else {
            return StatusCode::INTERNAL_SERVER_ERROR;
        };
        match e {
            JourneyError::NotInitialized => StatusCode::BAD_REQUEST,
            JourneyError::ProjectNotFound(_)
            | JourneyError::FeatureNotFound(_)
            | JourneyError::SkillNotFound(_)
            | JourneyError::IdeaNotFound(_)
            | JourneyError::NoteNotFound(_) => StatusCode::NOT_FOUND,
            JourneyError::SkillExists(_) => StatusCode::CONFLICT,
            JourneyError::InvalidStatus(_)
            | JourneyError::InvalidOrder(_)
            | JourneyError::EmptyField(_)
            | JourneyError::InvalidLevel(_) => StatusCode::BAD_REQUEST,
            JourneyError::Backend(_)
            | JourneyError::Io(_)
            | JourneyError::Yaml(_)
            | JourneyError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: JourneyError) -> StatusCode {
        AppError(e.into()).into_response().status()
    }

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(status_of(JourneyError::ProjectNotFound("p".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(JourneyError::FeatureNotFound("f".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(JourneyError::SkillNotFound("s".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(JourneyError::IdeaNotFound("i".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(JourneyError::NoteNotFound("n".into())), StatusCode::NOT_FOUND);
    }

    #[test]
    fn skill_exists_maps_to_409() {
        assert_eq!(status_of(JourneyError::SkillExists("Rust".into())), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_input_maps_to_400() {
        assert_eq!(status_of(JourneyError::EmptyField("title")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(JourneyError::InvalidStatus("done".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(JourneyError::InvalidOrder("9".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(JourneyError::InvalidLevel(0)), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(JourneyError::NotInitialized), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn backend_failure_maps_to_500() {
        assert_eq!(
            status_of(JourneyError::Backend("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let io_err = std::io::Error::other("disk full");
        assert_eq!(status_of(JourneyError::Io(io_err)), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn foreign_error_maps_to_500() {
        let response = AppError(anyhow::anyhow!("something unexpected")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn sentinels_map_to_gateway_statuses() {
        assert_eq!(
            AppError::bad_gateway("upstream down").into_response().status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::unavailable("no key").into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn response_body_is_json() {
        let response = AppError(JourneyError::NoteNotFound("n1".into()).into()).into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
