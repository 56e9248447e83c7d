//! Image upload pipeline.
//!
//! Turns a locally selected image into a hosted URL in three steps:
//!
//! 1. [`validate_file`] - size and MIME type checks, no I/O
//! 2. [`derive_file_name`] - `{prefix}_{owner}_{millis}.{ext}`
//! 3. [`ImageHost::upload`] - one multipart POST to the image host
//!
//! The returned URL is handed back to the caller, which embeds it in the
//! next profile payload. Nothing is retried or resumed: a failed upload is
//! restarted from validation.

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use tripnest_core::{EntityKind, ImageFile, ServiceProviderId};

use crate::config::ImageHostConfig;
use crate::error::{ClientError, ValidationError};

/// Largest accepted image, in bytes (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Accepted image MIME types.
pub const ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Errors raised by the image host.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The host answered with a non-2xx status.
    #[error("Upload failed: {0}")]
    Rejected(String),

    /// The request never produced a response.
    #[error("Upload failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx answer without a usable `secure_url`.
    #[error("Upload failed: host response did not include an image URL")]
    MalformedResponse,
}

/// Check an image against the size ceiling and the MIME allow-list.
///
/// # Errors
///
/// Returns [`ValidationError::FileTooLarge`] or
/// [`ValidationError::UnsupportedType`].
pub fn validate_file(file: &ImageFile) -> Result<(), ValidationError> {
    if file.size() > MAX_FILE_SIZE {
        return Err(ValidationError::FileTooLarge {
            size: file.size(),
            max_mib: MAX_FILE_SIZE / (1024 * 1024),
        });
    }

    let content_type = file.content_type.trim().to_ascii_lowercase();
    if !ALLOWED_TYPES.contains(&content_type.as_str()) {
        return Err(ValidationError::UnsupportedType(file.content_type.clone()));
    }

    Ok(())
}

/// Build the hosted file name for an upload.
///
/// Deterministic in its inputs. The extension of `original_name` is kept
/// (lowercased); names without one get `jpg`.
#[must_use]
pub fn derive_file_name(
    prefix: &str,
    original_name: &str,
    owner: ServiceProviderId,
    stamp_millis: i64,
) -> String {
    let extension = original_name
        .rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map_or_else(|| "jpg".to_string(), |(_, ext)| ext.to_ascii_lowercase());

    format!("{prefix}_{owner}_{stamp_millis}.{extension}")
}

/// Everything the host needs for one upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    /// The validated image.
    pub file: &'a ImageFile,
    /// Derived file name, with extension.
    pub file_name: &'a str,
    /// Host-side id, the file name without extension.
    pub public_id: &'a str,
    /// Host-side folder.
    pub folder: &'a str,
}

/// A remote image host.
pub trait ImageHost: Send + Sync {
    /// Upload one image and return its public HTTPS URL.
    fn upload(
        &self,
        request: UploadRequest<'_>,
    ) -> impl Future<Output = Result<String, UploadError>> + Send;
}

/// Cloudinary unsigned-upload client.
#[derive(Clone)]
pub struct CloudinaryHost {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: SecretString,
}

impl std::fmt::Debug for CloudinaryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryHost")
            .field("endpoint", &self.endpoint)
            .field("upload_preset", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryResponse {
    secure_url: Option<String>,
    error: Option<CloudinaryError>,
}

#[derive(Debug, Deserialize)]
struct CloudinaryError {
    message: String,
}

impl CloudinaryHost {
    /// Create a host client from configuration.
    #[must_use]
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint(),
            upload_preset: config.upload_preset.clone(),
        }
    }
}

impl ImageHost for CloudinaryHost {
    #[instrument(skip_all, fields(file_name = %request.file_name, folder = %request.folder))]
    async fn upload(&self, request: UploadRequest<'_>) -> Result<String, UploadError> {
        let part = Part::bytes(request.file.bytes.clone())
            .file_name(request.file_name.to_string())
            .mime_str(&request.file.content_type)?;

        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.expose_secret().to_string())
            .text("public_id", request.public_id.to_string())
            .text("folder", request.folder.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<CloudinaryResponse>(&body).ok();

        if !status.is_success() {
            let message = parsed
                .and_then(|r| r.error)
                .map(|e| e.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("image host returned HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), %message, "Image host rejected upload");
            return Err(UploadError::Rejected(message));
        }

        let url = parsed
            .and_then(|r| r.secure_url)
            .filter(|u| !u.is_empty())
            .ok_or(UploadError::MalformedResponse)?;

        debug!(%url, "Image uploaded");
        Ok(url)
    }
}

/// Validate, name and upload images for one image host.
#[derive(Debug)]
pub struct UploadPipeline<H> {
    host: H,
    last_stamp: AtomicI64,
}

impl<H: ImageHost> UploadPipeline<H> {
    /// Create a pipeline over `host`.
    #[must_use]
    pub const fn new(host: H) -> Self {
        Self {
            host,
            last_stamp: AtomicI64::new(0),
        }
    }

    /// The underlying host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Current time in milliseconds, forced strictly above every stamp this
    /// pipeline has handed out before.
    fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }

    /// Name for the next upload of `original_name` by `owner`.
    #[must_use]
    pub fn next_file_name(
        &self,
        kind: EntityKind,
        original_name: &str,
        owner: ServiceProviderId,
    ) -> String {
        derive_file_name(kind.upload_prefix(), original_name, owner, self.next_stamp())
    }

    /// Upload an already validated file under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError`] if the host rejects or fails the upload.
    pub async fn upload(
        &self,
        kind: EntityKind,
        file: &ImageFile,
        file_name: &str,
    ) -> Result<String, UploadError> {
        let public_id = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _)| stem);

        self.host
            .upload(UploadRequest {
                file,
                file_name,
                public_id,
                folder: kind.upload_folder(),
            })
            .await
    }

    /// Validate, name and upload `file` for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] before any network call if the
    /// file is unacceptable, or [`ClientError::Upload`] if the host fails.
    #[instrument(skip(self, file), fields(kind = %kind, owner = %owner, file = %file.name))]
    pub async fn run(
        &self,
        kind: EntityKind,
        file: &ImageFile,
        owner: ServiceProviderId,
    ) -> Result<String, ClientError> {
        validate_file(file)?;
        let file_name = self.next_file_name(kind, &file.name, owner);
        Ok(self.upload(kind, file, &file_name).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Host that records requests instead of sending them.
    #[derive(Default)]
    struct RecordingHost {
        requests: Mutex<Vec<(String, String, String)>>,
    }

    impl ImageHost for RecordingHost {
        async fn upload(&self, request: UploadRequest<'_>) -> Result<String, UploadError> {
            self.requests.lock().unwrap().push((
                request.file_name.to_string(),
                request.public_id.to_string(),
                request.folder.to_string(),
            ));
            Ok(format!("https://img.example/{}", request.file_name))
        }
    }

    fn jpeg(size: usize) -> ImageFile {
        ImageFile::new("lobby.JPG", "image/jpeg", vec![0; size])
    }

    #[test]
    fn test_validate_accepts_allowed_types() {
        for ct in ["image/jpeg", "image/jpg", "image/png", "image/webp", "IMAGE/PNG"] {
            let file = ImageFile::new("a", ct, vec![1, 2, 3]);
            assert!(validate_file(&file).is_ok(), "{ct} should be accepted");
        }
    }

    #[test]
    fn test_validate_rejects_other_types() {
        let file = ImageFile::new("anim.gif", "image/gif", vec![0; 10]);
        assert_eq!(
            validate_file(&file),
            Err(ValidationError::UnsupportedType("image/gif".to_string()))
        );
        let pdf = ImageFile::new("menu.pdf", "application/pdf", vec![0; 10]);
        assert!(validate_file(&pdf).is_err());
    }

    #[test]
    fn test_validate_size_ceiling_is_inclusive() {
        assert!(validate_file(&jpeg(MAX_FILE_SIZE)).is_ok());
        assert!(matches!(
            validate_file(&jpeg(MAX_FILE_SIZE + 1)),
            Err(ValidationError::FileTooLarge { max_mib: 10, .. })
        ));
    }

    #[test]
    fn test_derive_file_name_is_deterministic() {
        let owner = ServiceProviderId::new(42);
        let a = derive_file_name("hotel", "Lobby.JPG", owner, 1_700_000_000_000);
        let b = derive_file_name("hotel", "Lobby.JPG", owner, 1_700_000_000_000);
        assert_eq!(a, b);
        assert_eq!(a, "hotel_42_1700000000000.jpg");
    }

    #[test]
    fn test_derive_file_name_differs_by_millisecond() {
        let owner = ServiceProviderId::new(42);
        let a = derive_file_name("hotel", "a.png", owner, 1_700_000_000_000);
        let b = derive_file_name("hotel", "a.png", owner, 1_700_000_000_001);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_file_name_without_extension() {
        let name = derive_file_name("vehicle", "IMG_2231", ServiceProviderId::new(1), 5);
        assert_eq!(name, "vehicle_1_5.jpg");
    }

    #[test]
    fn test_next_file_name_never_repeats() {
        let pipeline = UploadPipeline::new(RecordingHost::default());
        let owner = ServiceProviderId::new(9);
        let names: Vec<_> = (0..50)
            .map(|_| pipeline.next_file_name(EntityKind::Hotel, "a.png", owner))
            .collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[tokio::test]
    async fn test_run_uploads_with_folder_and_public_id() {
        let pipeline = UploadPipeline::new(RecordingHost::default());
        let url = pipeline
            .run(EntityKind::TourGuide, &jpeg(1024), ServiceProviderId::new(3))
            .await
            .unwrap();

        let requests = pipeline.host().requests.lock().unwrap();
        let (file_name, public_id, folder) = requests.first().unwrap();
        assert!(file_name.starts_with("tour_guide_3_"));
        assert!(file_name.ends_with(".jpg"));
        assert_eq!(format!("{public_id}.jpg"), *file_name);
        assert_eq!(folder, "tour_guides");
        assert_eq!(url, format!("https://img.example/{file_name}"));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_file_before_upload() {
        let pipeline = UploadPipeline::new(RecordingHost::default());
        let err = pipeline
            .run(
                EntityKind::Hotel,
                &jpeg(MAX_FILE_SIZE + 1),
                ServiceProviderId::new(3),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(pipeline.host().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cloudinary_host_returns_secure_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1_1/demo/image/upload")
            .match_body(mockito::Matcher::Regex("name=\"upload_preset\"".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"secure_url":"https://res.cloudinary.com/demo/hotels/x.jpg"}"#)
            .create_async()
            .await;

        let host = CloudinaryHost::new(&ImageHostConfig {
            upload_url: server.url(),
            cloud_name: "demo".to_string(),
            upload_preset: SecretString::from("preset"),
        });
        let pipeline = UploadPipeline::new(host);

        let url = pipeline
            .run(EntityKind::Hotel, &jpeg(64), ServiceProviderId::new(1))
            .await
            .unwrap();

        assert_eq!(url, "https://res.cloudinary.com/demo/hotels/x.jpg");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_cloudinary_host_reports_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/image/upload")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Invalid preset"}}"#)
            .create_async()
            .await;

        let host = CloudinaryHost::new(&ImageHostConfig {
            upload_url: server.url(),
            cloud_name: "demo".to_string(),
            upload_preset: SecretString::from("wrong"),
        });

        let file = jpeg(64);
        let err = host
            .upload(UploadRequest {
                file: &file,
                file_name: "hotel_1_1.jpg",
                public_id: "hotel_1_1",
                folder: "hotels",
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Upload failed: Invalid preset");
    }

    #[tokio::test]
    async fn test_cloudinary_host_generic_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/image/upload")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let host = CloudinaryHost::new(&ImageHostConfig {
            upload_url: server.url(),
            cloud_name: "demo".to_string(),
            upload_preset: SecretString::from("preset"),
        });

        let file = jpeg(64);
        let err = host
            .upload(UploadRequest {
                file: &file,
                file_name: "hotel_1_1.jpg",
                public_id: "hotel_1_1",
                folder: "hotels",
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Upload failed: image host returned HTTP 502");
    }
}
