//! Receipt images and their upload
//!
//! A [`Receipt`] is checked for type and size when it is loaded, so a bad
//! file never reaches the network. Uploading goes through the
//! [`ReceiptUploader`] trait; [`HttpReceiptUploader`] is the real one.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::settings::UploadSettings;

/// Multipart field name the upload endpoint expects
pub const RECEIPT_FIELD: &str = "receipt";

/// Default cap on receipt size
pub const DEFAULT_MAX_RECEIPT_BYTES: u64 = 5 * 1024 * 1024;

const UPLOAD_FAILED: &str = "Failed to upload receipt";

/// Why a receipt could not be attached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select an image file (JPG, PNG, GIF)")]
    NotAnImage,

    #[error("File size must be less than {}", human_size(.limit))]
    TooLarge { size: u64, limit: u64 },

    #[error("Could not read receipt: {0}")]
    Io(String),

    #[error("Failed to upload receipt: {0}")]
    Http(String),

    /// The server answered with a failure status
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from upload server: {0}")]
    MalformedResponse(String),

    #[error("Receipt upload is not configured; set upload.endpoint or EXPENSE_TRACKER_UPLOAD_URL")]
    NotConfigured,
}

fn human_size(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    match *bytes {
        b if b >= MIB && b % MIB == 0 => format!("{}MB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{} bytes", b),
    }
}

/// Image MIME type for a file extension
fn image_mime(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// A receipt image ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Receipt {
    /// Load a receipt from disk, rejecting non-images and oversize files
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self, UploadError> {
        let mime = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(image_mime)
            .ok_or(UploadError::NotAnImage)?;

        let size = fs::metadata(path)
            .map_err(|e| UploadError::Io(format!("{}: {}", path.display(), e)))?
            .len();
        if size > max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        let bytes =
            fs::read(path).map_err(|e| UploadError::Io(format!("{}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| RECEIPT_FIELD.to_string());

        debug!(file = %file_name, size, mime, "receipt loaded");
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Build a receipt from bytes already in memory
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let mime = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(image_mime)
            .ok_or(UploadError::NotAnImage)?;

        let size = bytes.len() as u64;
        if size > max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Something that can store a receipt and hand back its URL
pub trait ReceiptUploader {
    fn upload(&self, receipt: &Receipt) -> Result<String, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
    error: Option<String>,
}

/// Turn an upload server reply into a URL or an error
pub fn interpret_response(success: bool, body: &str) -> Result<String, UploadError> {
    let parsed: Option<UploadResponse> = serde_json::from_str(body).ok();

    if !success {
        let message = parsed
            .and_then(|r| r.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UPLOAD_FAILED.to_string());
        return Err(UploadError::Rejected(message));
    }

    match parsed {
        Some(UploadResponse { url: Some(url), .. }) if !url.trim().is_empty() => Ok(url),
        Some(_) => Err(UploadError::MalformedResponse(
            "response has no url".to_string(),
        )),
        None => Err(UploadError::MalformedResponse(
            "response is not JSON".to_string(),
        )),
    }
}

/// Uploads receipts as multipart POSTs to a fixed endpoint
#[derive(Debug, Clone)]
pub struct HttpReceiptUploader {
    endpoint: String,
    client: Client,
}

impl HttpReceiptUploader {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Http(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Build from upload settings; fails when no endpoint is set
    pub fn from_settings(settings: &UploadSettings) -> Result<Self, UploadError> {
        let endpoint = settings
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(UploadError::NotConfigured)?;
        Self::new(endpoint, Duration::from_secs(settings.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ReceiptUploader for HttpReceiptUploader {
    fn upload(&self, receipt: &Receipt) -> Result<String, UploadError> {
        info!(endpoint = %self.endpoint, file = %receipt.file_name, size = receipt.size(), "uploading receipt");

        let part = multipart::Part::bytes(receipt.bytes.clone())
            .file_name(receipt.file_name.clone())
            .mime_str(receipt.mime)
            .map_err(|e| UploadError::Http(e.to_string()))?;
        let form = multipart::Form::new().part(RECEIPT_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| {
                warn!(error = %e, "receipt upload request failed");
                UploadError::Http(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| UploadError::Http(e.to_string()))?;

        let result = interpret_response(status.is_success(), &body);
        match &result {
            Ok(url) => info!(%url, "receipt uploaded"),
            Err(e) => warn!(%status, error = %e, "receipt upload rejected"),
        }
        result
    }
}
