pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Workflow API
        .route("/api/v1/workflow", get(handlers::handle_get_workflow))
        .route("/api/v1/workflow/count", put(handlers::handle_set_count))
        .route("/api/v1/workflow/generate", post(handlers::handle_generate))
        .route("/api/v1/workflow/navigate", post(handlers::handle_navigate))
        // Resume preview
        .route("/api/v1/resumes/current", get(handlers::handle_get_current))
        .route(
            "/api/v1/resumes/current/pdf",
            get(handlers::handle_preview_pdf),
        )
        // Export API
        .route(
            "/api/v1/exports/current",
            post(handlers::handle_export_current),
        )
        .route("/api/v1/exports/all", post(handlers::handle_export_all))
        .route(
            "/api/v1/notifications",
            get(handlers::handle_notifications),
        )
        .with_state(state)
}
