use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Photo too large (max 10MB)".to_string())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;

    let form = parser::parse_multipart(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let saved = pipeline::run(&state, form).await?;

    Ok(Json(json!({ "ok": true, "id": saved.id })))
}
