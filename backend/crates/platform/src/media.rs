//! Remote Media Store
//!
//! Uploaded images live in an external asset store; records keep only the
//! public URL and the store's asset id.
//!
//! - [`CloudinaryMediaStore`] - signed REST upload/destroy (SHA-1 request signature)
//! - [`InMemoryMediaStore`] - process-local store for tests and local runs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::crypto::sha1_hex;

// ============================================================================
// Types
// ============================================================================

/// A file received from a client, ready to hand to the store
#[derive(Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
    pub external_id: String,
}

/// Media store errors
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("Media upload failed: {0}")]
    Upload(String),

    #[error("Media delete failed for {external_id}: {reason}")]
    Delete { external_id: String, reason: String },

    #[error("Media store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Empty upload")]
    EmptyUpload,
}

/// Remote asset store
#[trait_variant::make(MediaStore: Send)]
pub trait LocalMediaStore {
    /// Store the file and return its public URL and asset id
    async fn upload(&self, file: MediaUpload) -> Result<UploadedAsset, MediaError>;

    /// Remove an asset; deleting an unknown id succeeds
    async fn delete(&self, external_id: &str) -> Result<(), MediaError>;
}

/// Derive the asset id from a stored URL
///
/// Cloudinary delivery URLs carry the id after `/upload/` (optionally behind a
/// `v<digits>` version segment, possibly with folders); anything else falls
/// back to the last path segment. The file extension is dropped.
pub fn external_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;

    let tail = match path.split_once("/upload/") {
        Some((_, rest)) => {
            let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
            if segments
                .first()
                .is_some_and(|s| s.len() > 1 && s.starts_with('v') && s[1..].bytes().all(|b| b.is_ascii_digit()))
            {
                segments.remove(0);
            }
            segments.join("/")
        }
        None => path.rsplit('/').next()?.to_string(),
    };

    let id = match tail.rsplit_once('.') {
        Some((stem, _ext)) if !stem.ends_with('/') => stem.to_string(),
        _ => tail,
    };

    (!id.is_empty()).then_some(id)
}

// ============================================================================
// Cloudinary
// ============================================================================

/// Cloudinary account configuration
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Optional folder assets are uploaded into
    pub folder: Option<String>,
    /// API base URL (default: https://api.cloudinary.com)
    pub api_base_url: String,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: None,
            api_base_url: "https://api.cloudinary.com".to_string(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.api_base_url.trim_end_matches('/'),
            self.cloud_name,
            action
        )
    }

    /// Sign parameters: sorted `k=v` pairs joined by `&`, secret appended, SHA-1
    fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        sha1_hex(format!("{}{}", to_sign, self.api_secret).as_bytes())
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("folder", &self.folder)
            .finish()
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Cloudinary-backed media store
#[derive(Debug, Clone)]
pub struct CloudinaryMediaStore {
    config: CloudinaryConfig,
    http_client: reqwest::Client,
}

impl CloudinaryMediaStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn rejected(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        MediaError::Rejected { status, body }
    }
}

impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, file: MediaUpload) -> Result<UploadedAsset, MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::EmptyUpload);
        }

        let timestamp = crate::jwt::now_secs().to_string();
        let mut params = BTreeMap::new();
        params.insert("timestamp", timestamp.clone());
        if let Some(folder) = &self.config.folder {
            params.insert("folder", folder.clone());
        }
        let signature = self.config.sign(&params);

        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| MediaError::Upload(e.to_string()))?;
        }

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);
        if let Some(folder) = &self.config.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .http_client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        tracing::debug!(external_id = %body.public_id, "Uploaded media asset");

        Ok(UploadedAsset {
            url: body.secure_url,
            external_id: body.public_id,
        })
    }

    async fn delete(&self, external_id: &str) -> Result<(), MediaError> {
        let timestamp = crate::jwt::now_secs().to_string();
        let mut params = BTreeMap::new();
        params.insert("public_id", external_id.to_string());
        params.insert("timestamp", timestamp.clone());
        let signature = self.config.sign(&params);

        let form = [
            ("public_id", external_id.to_string()),
            ("api_key", self.config.api_key.clone()),
            ("timestamp", timestamp),
            ("signature", signature),
        ];

        let response = self
            .http_client
            .post(self.config.endpoint("destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::Delete {
                external_id: external_id.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let body: DestroyResponse = response.json().await.map_err(|e| MediaError::Delete {
            external_id: external_id.to_string(),
            reason: e.to_string(),
        })?;

        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                tracing::debug!(external_id, "Media asset already absent");
                Ok(())
            }
            other => Err(MediaError::Delete {
                external_id: external_id.to_string(),
                reason: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Process-local media store
///
/// Clones share the same storage. Delete failures can be switched on to
/// exercise partial-failure paths.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMediaStore {
    assets: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_deletes: Arc<AtomicBool>,
    fail_uploads: Arc<AtomicBool>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `delete` fail
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every following `upload` fail
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, external_id: &str) -> bool {
        self.assets.read().await.contains_key(external_id)
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.assets.read().await.is_empty()
    }
}

impl MediaStore for InMemoryMediaStore {
    async fn upload(&self, file: MediaUpload) -> Result<UploadedAsset, MediaError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Upload("upload failure injected".to_string()));
        }
        if file.bytes.is_empty() {
            return Err(MediaError::EmptyUpload);
        }

        let external_id = uuid::Uuid::new_v4().simple().to_string();
        let extension = file
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());
        let url = format!("memory://media/{}.{}", external_id, extension);

        self.assets
            .write()
            .await
            .insert(external_id.clone(), file.bytes);

        Ok(UploadedAsset { url, external_id })
    }

    async fn delete(&self, external_id: &str) -> Result<(), MediaError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaError::Delete {
                external_id: external_id.to_string(),
                reason: "delete failure injected".to_string(),
            });
        }
        self.assets.write().await.remove(external_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BTreeMap, CloudinaryConfig, InMemoryMediaStore, MediaError, MediaStore, MediaUpload,
        external_id_from_url, sha1_hex,
    };

    fn upload(name: &str) -> MediaUpload {
        MediaUpload {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_external_id_from_cloudinary_url() {
        assert_eq!(
            external_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/v1712345678/abc123.jpg"
            ),
            Some("abc123".to_string())
        );
        assert_eq!(
            external_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/v1/club/events/abc123.png"
            ),
            Some("club/events/abc123".to_string())
        );
    }

    #[test]
    fn test_external_id_fallback_last_segment() {
        assert_eq!(
            external_id_from_url("https://cdn.example.com/a/b/photo.webp?x=1"),
            Some("photo".to_string())
        );
        assert_eq!(external_id_from_url("https://cdn.example.com/"), None);
    }

    #[test]
    fn test_signature_sorted_params() {
        let config = CloudinaryConfig::new("demo", "key", "abcd");
        let mut params = BTreeMap::new();
        params.insert("timestamp", "1315060510".to_string());
        params.insert("public_id", "sample_image".to_string());
        assert_eq!(
            config.sign(&params),
            sha1_hex(b"public_id=sample_image&timestamp=1315060510abcd")
        );
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = CloudinaryConfig::new("demo", "key", "top-secret");
        assert!(!format!("{:?}", config).contains("top-secret"));
    }

    #[tokio::test]
    async fn test_in_memory_upload_and_delete() {
        let store = InMemoryMediaStore::new();
        let asset = store.upload(upload("cat.PNG")).await.unwrap();

        assert!(asset.url.ends_with(".png"));
        assert_eq!(external_id_from_url(&asset.url), Some(asset.external_id.clone()));
        assert!(store.contains(&asset.external_id).await);

        store.delete(&asset.external_id).await.unwrap();
        assert!(store.is_empty().await);

        // unknown ids are fine
        store.delete("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_in_memory_failure_injection() {
        let store = InMemoryMediaStore::new();
        let asset = store.upload(upload("a.jpg")).await.unwrap();

        store.set_fail_deletes(true);
        assert!(matches!(
            store.delete(&asset.external_id).await,
            Err(MediaError::Delete { .. })
        ));
        assert!(store.contains(&asset.external_id).await);

        store.set_fail_uploads(true);
        assert!(store.upload(upload("b.jpg")).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let store = InMemoryMediaStore::new();
        let mut file = upload("a.jpg");
        file.bytes.clear();
        assert!(matches!(store.upload(file).await, Err(MediaError::EmptyUpload)));
    }
}
