//! Locally selected image file awaiting upload.

use core::fmt;

/// An image the provider picked for a profile photo, logo or vehicle photo.
///
/// Holds the raw bytes together with the browser-reported name and MIME
/// type. Nothing here is validated; the upload pipeline decides whether the
/// file is acceptable.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Original file name, e.g. `lobby.JPG`.
    pub name: String,
    /// Declared MIME type, e.g. `image/jpeg`.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Create an image file from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercased extension of the original name, if it has one.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

// Keep multi-megabyte payloads out of debug output.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_lowercased() {
        let file = ImageFile::new("Lobby.JPG", "image/jpeg", vec![0; 4]);
        assert_eq!(file.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn test_extension_missing() {
        assert_eq!(ImageFile::new("photo", "image/png", vec![]).extension(), None);
        assert_eq!(ImageFile::new(".hidden", "image/png", vec![]).extension(), None);
        assert_eq!(ImageFile::new("trailing.", "image/png", vec![]).extension(), None);
    }

    #[test]
    fn test_debug_omits_bytes() {
        let file = ImageFile::new("a.png", "image/png", vec![7; 1024]);
        let debug = format!("{file:?}");
        assert!(debug.contains("size: 1024"));
        assert!(!debug.contains("7, 7"));
    }
}
