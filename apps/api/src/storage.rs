use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Blob storage for files attached to resumes.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: Option<&str>)
        -> Result<(), AppError>;
}

/// S3 / MinIO bucket.
pub struct S3FileStore {
    client: S3Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!(bytes = size, "Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// Object key for an upload: `uploads/{resume_id}/{uuid}{ext}`, keeping the
/// client filename's extension (lowercased, with the dot) when it has one.
pub fn upload_key(resume_id: uuid::Uuid, original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(stem, ext)| (stem, ext.trim()))
        .filter(|(stem, ext)| {
            !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|(_, ext)| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("uploads/{resume_id}/{}{ext}", uuid::Uuid::new_v4())
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    pub struct MemoryFileStore {
        pub objects: RwLock<HashMap<String, (Bytes, Option<String>)>>,
    }

    #[async_trait]
    impl FileStore for MemoryFileStore {
        async fn put(
            &self,
            key: &str,
            body: Bytes,
            content_type: Option<&str>,
        ) -> Result<(), AppError> {
            self.objects
                .write()
                .await
                .insert(key.to_string(), (body, content_type.map(str::to_string)));
            Ok(())
        }
    }
}
