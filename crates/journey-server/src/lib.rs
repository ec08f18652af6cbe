pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use journey_core::Store;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Open the journey under `root` and build the router over it.
pub fn build_router(root: &Path) -> anyhow::Result<Router> {
    let store = Store::open(root)?;
    Ok(build_router_with_store(store))
}

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router_with_store(store: Store) -> Router {
    let app_state = state::AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // State
        .route("/api/state", get(routes::state::get_state))
        .route("/api/journey", get(routes::state::get_journey))
        // Projects
        .route(
            "/api/projects",
            get(routes::projects::list_projects)
                .post(routes::projects::create_project)
                .delete(routes::projects::clear_projects),
        )
        .route(
            "/api/projects/order",
            put(routes::projects::reorder_projects),
        )
        .route(
            "/api/projects/{id}",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/projects/{id}/move",
            post(routes::projects::move_project),
        )
        .route(
            "/api/projects/{id}/skills",
            post(routes::projects::link_skill),
        )
        .route(
            "/api/projects/{id}/skills/{sid}",
            delete(routes::projects::unlink_skill),
        )
        // Features
        .route(
            "/api/projects/{id}/features",
            post(routes::features::add_feature),
        )
        .route(
            "/api/projects/{id}/features/order",
            put(routes::features::reorder_features),
        )
        .route(
            "/api/projects/{id}/features/{fid}",
            put(routes::features::update_feature).delete(routes::features::delete_feature),
        )
        .route(
            "/api/projects/{id}/features/{fid}/toggle",
            post(routes::features::toggle_feature),
        )
        // Skills
        .route(
            "/api/skills",
            get(routes::skills::list_skills).post(routes::skills::create_skill),
        )
        .route(
            "/api/skills/{id}",
            put(routes::skills::update_skill).delete(routes::skills::delete_skill),
        )
        .route("/api/skills/{id}/reset", post(routes::skills::reset_skill))
        // Ideas
        .route(
            "/api/ideas",
            get(routes::ideas::list_ideas).post(routes::ideas::create_idea),
        )
        .route("/api/ideas/order", put(routes::ideas::reorder_ideas))
        .route(
            "/api/ideas/{id}",
            put(routes::ideas::update_idea).delete(routes::ideas::delete_idea),
        )
        .route("/api/ideas/{id}/details", post(routes::ideas::add_detail))
        .route("/api/ideas/{id}/promote", post(routes::ideas::promote_idea))
        // Notes
        .route(
            "/api/notes",
            get(routes::notes::list_notes).post(routes::notes::create_note),
        )
        .route(
            "/api/notes/{id}",
            put(routes::notes::update_note).delete(routes::notes::delete_note),
        )
        // Generation pass-through
        .route("/api/v0", post(routes::generate::generate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the journey API server on `port`.
pub async fn serve(root: &Path, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener).await
}

/// Start the journey API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(root: &Path, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root)?;

    tracing::info!("journey API listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
