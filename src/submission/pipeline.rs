use crate::error::AppError;
use crate::models::{NewSubmission, PhotoRef, Submission};
use crate::state::SharedState;
use crate::storage::blobs::MAX_PHOTO_BYTES;

use super::parser::SubmitForm;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Validate a parsed form, store its photo, and record the submission.
pub async fn run(state: &SharedState, form: SubmitForm) -> Result<Submission, AppError> {
    let raw_payload = form
        .payload
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing payload".to_string()))?;

    let payload: serde_json::Value = serde_json::from_str(&raw_payload)
        .map_err(|_| AppError::BadRequest("Invalid payload JSON".to_string()))?;

    // Empty file inputs arrive as zero-length parts.
    let photo_file = form.photo.filter(|f| !f.data.is_empty());

    if let Some(file) = &photo_file {
        if file.data.len() > MAX_PHOTO_BYTES {
            return Err(AppError::PayloadTooLarge(
                "Photo too large (max 10MB)".to_string(),
            ));
        }
    }

    let photo = match photo_file {
        Some(file) => {
            let mime_type = file
                .content_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME.to_string());
            let original_name = file.file_name.filter(|n| !n.is_empty());

            let storage_name = state
                .blobs
                .put(&file.data, original_name.as_deref().unwrap_or(""), &mime_type)
                .await
                .map_err(save_failed)?;

            Some(PhotoRef {
                original_name: original_name.unwrap_or_else(|| storage_name.clone()),
                storage_name,
                mime_type,
                size: file.data.len() as u64,
            })
        }
        None => None,
    };

    state
        .submissions
        .append(NewSubmission { payload, photo })
        .await
        .map_err(save_failed)
}

fn save_failed(err: impl std::fmt::Display) -> AppError {
    AppError::Failed {
        message: "Failed to save submission".to_string(),
        cause: err.to_string(),
    }
}
