use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{ObjectStore, StorageError, StorageResult};
use crate::models::{NewSubmission, Submission};

pub const SUBMISSIONS_KEY: &str = "submissions/submissions.json";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Newest-first list of submissions kept in a single JSON document.
///
/// Appends from this process are serialized, so none are lost. Separate
/// processes writing the same document still race (last writer wins).
pub struct SubmissionStore {
    objects: Arc<dyn ObjectStore>,
    write_lock: Mutex<()>,
}

/// Result of loading the backing document. Records are kept as raw JSON so
/// that entries written by older versions survive a rewrite untouched.
enum Loaded {
    Missing,
    Parsed(Vec<Value>),
    Corrupt { raw: Vec<u8>, reason: String },
}

impl SubmissionStore {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            objects,
            write_lock: Mutex::new(()),
        }
    }

    /// All stored records verbatim, newest first. A missing document or one
    /// that is not a JSON array reads as an empty list; backend failures are
    /// returned as errors.
    pub async fn read_all(&self) -> StorageResult<Vec<Value>> {
        match self.load().await? {
            Loaded::Missing => Ok(Vec::new()),
            Loaded::Parsed(all) => Ok(all),
            Loaded::Corrupt { reason, .. } => {
                tracing::error!("Submissions document {SUBMISSIONS_KEY} is unreadable: {reason}");
                Ok(Vec::new())
            }
        }
    }

    /// Assign an id and timestamp, then insert the record at the front.
    pub async fn append(&self, new: NewSubmission) -> StorageResult<Submission> {
        let _guard = self.write_lock.lock().await;

        // Stamped under the lock so list order matches timestamp order.
        let submission = Submission {
            id: generate_id("sub"),
            created_at: Utc::now(),
            payload: new.payload,
            photo: new.photo,
        };

        let mut all = match self.load().await? {
            Loaded::Missing => {
                tracing::info!("No submissions document yet, starting fresh");
                Vec::new()
            }
            Loaded::Parsed(all) => all,
            Loaded::Corrupt { raw, reason } => {
                self.quarantine(&raw, &reason).await?;
                Vec::new()
            }
        };

        all.insert(0, serde_json::to_value(&submission)?);

        let body = serde_json::to_vec_pretty(&all)?;
        self.objects
            .put(SUBMISSIONS_KEY, &body, JSON_CONTENT_TYPE)
            .await?;

        tracing::info!("Saved submission {} ({} total)", submission.id, all.len());
        Ok(submission)
    }

    async fn load(&self) -> StorageResult<Loaded> {
        let raw = match self.objects.get(SUBMISSIONS_KEY).await {
            Ok(raw) => raw,
            Err(StorageError::NotFound(_)) => return Ok(Loaded::Missing),
            Err(e) => return Err(e),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Loaded::Missing);
        }

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Array(all)) => Ok(Loaded::Parsed(all)),
            Ok(_) => Ok(Loaded::Corrupt {
                raw,
                reason: "document is not a JSON array".to_string(),
            }),
            Err(error) => Ok(Loaded::Corrupt {
                raw,
                reason: error.to_string(),
            }),
        }
    }

    /// Keep a copy of an unparseable document before it gets replaced.
    async fn quarantine(&self, raw: &[u8], reason: &str) -> StorageResult<()> {
        let key = format!(
            "submissions/submissions.corrupt-{}.json",
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        );
        self.objects.put(&key, raw, JSON_CONTENT_TYPE).await?;
        tracing::error!(
            "Submissions document was unreadable ({reason}); preserved {} bytes at {key}",
            raw.len()
        );
        Ok(())
    }
}

pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::now_v7().simple())
}
