use axum::extract::State;
use axum::http::{header, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::auth::extractor::query_param;
use crate::auth::AdminKey;
use crate::error::AppError;
use crate::state::SharedState;

pub async fn responses(
    _admin: AdminKey,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let submissions = state.submissions.read_all().await?;
    Ok(Json(json!({ "ok": true, "submissions": submissions })))
}

pub async fn photo(
    _admin: AdminKey,
    State(state): State<SharedState>,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let storage_name = query_param(&uri, "storageName")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing storageName".to_string()))?;

    let data = state.blobs.get(&storage_name).await.map_err(|e| {
        tracing::warn!("Photo {storage_name:?} unavailable: {e}");
        AppError::NotFound("Not found".to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        data,
    ))
}
