//! Remote image hosting port.

use async_trait::async_trait;

/// Folder under which all blog images live at the media provider.
pub const BLOG_IMAGE_FOLDER: &str = "blog_images";

/// Remote image store, addressed by folder plus public id.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload image bytes, returning the hosted URL.
    async fn upload(
        &self,
        folder: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaError>;

    /// Delete a previously uploaded object.
    async fn delete(&self, folder: &str, public_id: &str) -> Result<(), MediaError>;
}

/// Media store errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Media upload failed: {0}")]
    Upload(String),

    #[error("Media delete failed: {0}")]
    Delete(String),
}

/// Derive a stored object's public id from its hosted URL: the trailing
/// path segment with the file extension stripped.
pub fn public_id_from_url(url: &str) -> Option<&str> {
    let segment = url.rsplit('/').next()?;
    if segment.is_empty() {
        return None;
    }
    Some(segment.split('.').next().unwrap_or(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_strips_extension() {
        assert_eq!(
            public_id_from_url("https://media.example.com/blog_images/abc123.jpg"),
            Some("abc123")
        );
    }

    #[test]
    fn public_id_without_extension() {
        assert_eq!(
            public_id_from_url("https://media.example.com/blog_images/abc123"),
            Some("abc123")
        );
    }

    #[test]
    fn public_id_of_bare_or_trailing_slash_url() {
        assert_eq!(public_id_from_url("https://media.example.com/dir/"), None);
        assert_eq!(public_id_from_url(""), None);
    }
}
