use std::sync::Arc;

use uuid::Uuid;

use super::{ObjectStore, StorageError, StorageResult};

/// Largest photo accepted, in bytes (10 MiB).
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

const KEY_PREFIX: &str = "photos/";

/// Photo storage keyed by generated storage names.
#[derive(Clone)]
pub struct BlobStore {
    objects: Arc<dyn ObjectStore>,
}

impl BlobStore {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// Store `data` under a freshly generated name and return that name.
    /// `original_name` and `mime_type` only pick the extension.
    pub async fn put(
        &self,
        data: &[u8],
        original_name: &str,
        mime_type: &str,
    ) -> StorageResult<String> {
        if data.len() > MAX_PHOTO_BYTES {
            return Err(StorageError::TooLarge {
                size: data.len(),
                max: MAX_PHOTO_BYTES,
            });
        }

        let ext = infer_extension(mime_type, original_name);
        let storage_name = format!("photo_{}.{ext}", Uuid::now_v7().simple());
        let content_type = content_type_for(ext);

        self.objects
            .put_new(&format!("{KEY_PREFIX}{storage_name}"), data, content_type)
            .await?;

        tracing::info!("Stored photo {storage_name} ({} bytes)", data.len());
        Ok(storage_name)
    }

    pub async fn get(&self, storage_name: &str) -> StorageResult<Vec<u8>> {
        if !is_storage_name(storage_name) {
            return Err(StorageError::NotFound(storage_name.to_string()));
        }
        self.objects
            .get(&format!("{KEY_PREFIX}{storage_name}"))
            .await
    }
}

/// Map a client MIME type (or, failing that, the filename's extension) to
/// one of a fixed set of extensions. Unknown inputs map to `bin`.
pub fn infer_extension(mime_type: &str, original_name: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let from_mime = match essence.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    };
    if let Some(ext) = from_mime {
        return ext;
    }

    let from_name = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match from_name.as_deref() {
        Some("jpg" | "jpeg") => "jpg",
        Some("png") => "png",
        Some("webp") => "webp",
        Some("gif") => "gif",
        _ => "bin",
    }
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// True for names this store could have generated.
fn is_storage_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}
