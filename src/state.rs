use std::sync::Arc;

use crate::config::Config;
use crate::storage::{BlobStore, SubmissionStore};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub blobs: BlobStore,
    pub submissions: SubmissionStore,
}
