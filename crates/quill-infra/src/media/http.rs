//! HTTP media provider adapter.
//!
//! Uploads go to `POST {endpoint}/{folder}` as multipart; the provider
//! answers `{ "url": ... }`. Deletes go to `DELETE
//! {endpoint}/{folder}/{public_id}`.

use async_trait::async_trait;
use serde::Deserialize;

use quill_core::ports::{MediaError, MediaStore};

/// Media provider configuration.
#[derive(Debug, Clone)]
pub struct MediaApiConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl MediaApiConfig {
    /// Read `MEDIA_API_URL` and `MEDIA_API_KEY`; `None` when the endpoint is
    /// not set, in which case callers fall back to `InMemoryMediaStore`.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("MEDIA_API_URL").ok()?;
        Some(Self {
            endpoint,
            api_key: std::env::var("MEDIA_API_KEY").unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Media store backed by an HTTP image host.
pub struct HttpMediaStore {
    client: reqwest::Client,
    config: MediaApiConfig,
}

impl HttpMediaStore {
    pub fn new(config: MediaApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/{folder}", self.config.endpoint))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Upload(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        tracing::debug!(url = %body.url, "image uploaded");
        Ok(body.url)
    }

    async fn delete(&self, folder: &str, public_id: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(format!("{}/{folder}/{public_id}", self.config.endpoint))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;

        // Missing objects are treated as already deleted.
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(MediaError::Delete(format!(
                "provider returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
