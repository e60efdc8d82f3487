//! Image uploads to the hosted storage bucket.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use super::HostedService;
use crate::domain::ports::{BlobStore, BlobStoreError};

/// Public bucket holding request images.
pub const DEFAULT_IMAGE_BUCKET: &str = "request-images";

pub struct HostedBlobStore {
    service: HostedService,
    bucket: String,
}

impl HostedBlobStore {
    pub fn new(service: HostedService, bucket: impl Into<String>) -> Self {
        Self {
            service,
            bucket: bucket.into(),
        }
    }

    fn object_path(&self, path: &str) -> String {
        format!("storage/v1/object/{}/{}", self.bucket, path.trim_start_matches('/'))
    }

    fn public_path(&self, path: &str) -> String {
        format!(
            "storage/v1/object/public/{}/{}",
            self.bucket,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl BlobStore for HostedBlobStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobStoreError> {
        let upload_url = self
            .service
            .url(&self.object_path(path))
            .map_err(|error| BlobStoreError::rejected(error.to_string()))?;
        let public_url = self
            .service
            .url(&self.public_path(path))
            .map_err(|error| BlobStoreError::rejected(error.to_string()))?;
        let size = bytes.len();

        let response = self
            .service
            .client()
            .post(upload_url)
            .header("apikey", self.service.anon_key())
            .header(AUTHORIZATION, format!("Bearer {}", self.service.anon_key()))
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|error| BlobStoreError::connection(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, path, "image upload refused");
            return Err(BlobStoreError::rejected(format!("storage answered {status}")));
        }
        debug!(path, size, "image stored");
        Ok(public_url.into())
    }
}
