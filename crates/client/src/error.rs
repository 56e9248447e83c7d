//! Error taxonomy shared by the API clients, upload pipeline and wizards.

use thiserror::Error;

use crate::store::StoreError;
use crate::upload::UploadError;

/// A local precondition failed. Never reaches the network; the user fixes
/// the input and tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field is present but malformed.
    #[error("{field}: {reason}")]
    Invalid {
        /// Human-readable field label.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The selected image exceeds the size ceiling.
    #[error("Image must be {max_mib} MB or smaller (selected file is {size} bytes)")]
    FileTooLarge {
        /// Size of the rejected file in bytes.
        size: usize,
        /// Ceiling in MiB.
        max_mib: usize,
    },

    /// The selected image is not an accepted MIME type.
    #[error("Unsupported image type '{0}'. Use a JPEG, PNG or WebP image")]
    UnsupportedType(String),
}

/// Errors raised by API clients, the upload pipeline and the submit flow.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No access token or service provider in the session store.
    #[error("Not authenticated. Please sign in again")]
    AuthMissing,

    /// Local validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or a status-line fallback.
        message: String,
    },

    /// The image host rejected or failed the upload.
    #[error("Image upload failed: {0}")]
    Upload(#[from] UploadError),

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A 2xx response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedBody(String),

    /// Reading or writing the local store failed.
    #[error("Local storage error: {0}")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// HTTP status of an API failure, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
