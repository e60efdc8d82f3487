//! Port for storing request images and handing back a public URL.

use async_trait::async_trait;

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// The storage service could not be reached.
        Connection { message: String } =>
            "blob store connection failed: {message}",
        /// The storage service refused the upload.
        Rejected { message: String } =>
            "blob store rejected upload: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `path` and return the object's public URL.
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobStoreError>;
}

/// Store that discards content and returns a predictable URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBlobStore;

#[async_trait]
impl BlobStore for FixtureBlobStore {
    async fn upload(
        &self,
        path: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, BlobStoreError> {
        Ok(format!("https://storage.invalid/{path}"))
    }
}

impl From<BlobStoreError> for Error {
    fn from(err: BlobStoreError) -> Self {
        match err {
            BlobStoreError::Connection { message } => {
                Error::service_unavailable(format!("image storage unavailable: {message}"))
            }
            BlobStoreError::Rejected { message } => {
                Error::invalid_request(format!("image upload rejected: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_url_embeds_path() {
        let url = FixtureBlobStore
            .upload("requests/a/1.png", "image/png", vec![1, 2, 3])
            .await
            .expect("fixture upload succeeds");
        assert!(url.ends_with("requests/a/1.png"));
    }
}
