//! In-memory media store - used when no media provider is configured.
//!
//! Hands out URLs shaped like the hosted ones
//! (`{base}/{folder}/{public_id}.{ext}`) so public-id derivation from stored
//! URLs behaves exactly as it does against the real provider.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::ports::{MediaError, MediaStore};

#[derive(Default)]
pub struct InMemoryMediaStore {
    base_url: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self {
            base_url: "https://media.invalid".to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn contains(&self, folder: &str, public_id: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&format!("{folder}/{public_id}"))
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let public_id = Uuid::new_v4().simple().to_string();
        let ext = filename.rsplit('.').next().unwrap_or("bin");

        self.objects
            .write()
            .await
            .insert(format!("{folder}/{public_id}"), bytes);

        Ok(format!("{}/{folder}/{public_id}.{ext}", self.base_url))
    }

    async fn delete(&self, folder: &str, public_id: &str) -> Result<(), MediaError> {
        // Idempotent, matching hosted providers.
        self.objects
            .write()
            .await
            .remove(&format!("{folder}/{public_id}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::ports::public_id_from_url;

    #[tokio::test]
    async fn upload_then_delete_by_derived_public_id() {
        let store = InMemoryMediaStore::new();

        let url = store
            .upload("blog_images", "photo.png", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(store.len().await, 1);

        let public_id = public_id_from_url(&url).unwrap();
        assert!(store.contains("blog_images", public_id).await);

        store.delete("blog_images", public_id).await.unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn url_keeps_original_extension() {
        let store = InMemoryMediaStore::new();
        let url = store
            .upload("blog_images", "cover.webp", vec![0])
            .await
            .unwrap();
        assert!(url.ends_with(".webp"));
    }
}
