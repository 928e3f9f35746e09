use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use super::{ObjectStore, StorageError, StorageResult};
use crate::config::S3Config;

/// Object store backed by an S3 (or S3-compatible) bucket.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    /// Build a client from the standard AWS credential chain, pinned to the
    /// configured region and optionally a custom endpoint.
    pub async fn connect(config: &S3Config) -> Self {
        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = Builder::from(&base);
        if let Some(endpoint) = &config.endpoint_url {
            // S3-compatible services generally need path-style addressing.
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(S3Client::from_conf(builder.build()), config)
    }

    pub fn new(client: S3Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(
            "Uploaded s3://{}/{key} ({} bytes, etag {:?})",
            self.bucket,
            data.len(),
            result.e_tag()
        );
        Ok(())
    }

    async fn put_new(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()> {
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .if_none_match("*")
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!("Created s3://{}/{key} ({} bytes)", self.bucket, data.len());
                Ok(())
            }
            Err(e) if e.raw_response().map(|r| r.status().as_u16()) == Some(412) => {
                Err(StorageError::AlreadyExists(key.to_string()))
            }
            Err(e) => Err(StorageError::Backend(DisplayErrorContext(&e).to_string())),
        }
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    return Err(StorageError::NotFound(key.to_string()));
                }
                return Err(StorageError::Backend(DisplayErrorContext(&e).to_string()));
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("reading s3://{}/{key}: {e}", self.bucket)))?;
        Ok(data.into_bytes().to_vec())
    }

    fn describe(&self) -> String {
        format!("s3 bucket {} in {}", self.bucket, self.region)
    }
}
