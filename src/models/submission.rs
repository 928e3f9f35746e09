use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed slambook entry. Write-once; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoRef>,
}

/// Metadata for a stored photo. `original_name` and `mime_type` are
/// client-supplied and untrusted; `storage_name` is the blob store key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    pub storage_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
}

/// A submission before the store assigns its id and timestamp.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub payload: serde_json::Value,
    pub photo: Option<PhotoRef>,
}
