pub mod admin;
pub mod submit;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/submit", post(submit::submit))
        // Admin
        .route("/api/admin/responses", get(admin::responses))
        .route("/api/admin/photo", get(admin::photo))
}
