//! Core data types for the Pixarify pipeline.
//!
//! None of these outlive a single interaction: an upload is created when the
//! user submits a file and dropped once the response is rendered.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Image formats accepted at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Extensions the file picker offers.
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = ["jpg", "jpeg", "png"];

    /// Map a file extension (case insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// MIME type used in data URLs.
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "jpeg"),
            ImageFormat::Png => write!(f, "png"),
        }
    }
}

/// A user-uploaded portrait, held in memory for one interaction.
///
/// The bytes are not decoded locally. Oversized or malformed payloads are
/// rejected by the remote services.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    file_name: String,
}

impl UploadedImage {
    /// Wrap uploaded bytes, deriving the format from the declared file name.
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> PipelineResult<Self> {
        let file_name = file_name.into();
        if bytes.is_empty() {
            return Err(PipelineError::EmptyUpload);
        }

        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        let format = ImageFormat::from_extension(&extension)
            .ok_or(PipelineError::UnsupportedFormat { extension })?;

        Ok(Self {
            bytes,
            format,
            file_name,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard (padded) base64 encoding of the raw bytes.
    pub fn encode_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Return a data URL suitable for OpenAI-style and Replicate APIs.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.media_type(),
            self.encode_base64()
        )
    }
}

// Bytes are elided so uploads never end up in logs.
impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Comma-separated visual attributes produced by the description stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptionResult(String);

impl DescriptionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The individual attributes, trimmed, empty entries dropped.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.0.split(',').map(str::trim).filter(|a| !a.is_empty())
    }
}

impl fmt::Display for DescriptionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output locator of a generated image hosted by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedImageReference(String);

impl GeneratedImageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("Png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("gif"), None);
        assert_eq!(ImageFormat::from_extension(""), None);
    }

    #[test]
    fn test_uploaded_image_jpeg() {
        let image = UploadedImage::new(JPEG_HEADER.to_vec(), "me.jpg").unwrap();
        assert_eq!(image.format(), ImageFormat::Jpeg);
        assert_eq!(image.file_name(), "me.jpg");
        assert_eq!(image.len(), 4);
    }

    #[test]
    fn test_uploaded_image_rejects_empty() {
        let err = UploadedImage::new(vec![], "me.png").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyUpload));
    }

    #[test]
    fn test_uploaded_image_rejects_other_extensions() {
        let err = UploadedImage::new(JPEG_HEADER.to_vec(), "me.webp").unwrap_err();
        match err {
            PipelineError::UnsupportedFormat { extension } => assert_eq!(extension, "webp"),
            other => panic!("unexpected error: {other}"),
        }

        let err = UploadedImage::new(JPEG_HEADER.to_vec(), "no_extension").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_base64_round_trips_to_original_bytes() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend((0..=255u8).cycle().take(1021));
        let image = UploadedImage::new(bytes.clone(), "portrait.png").unwrap();

        let encoded = image.encode_base64();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_data_url_uses_declared_media_type() {
        let jpeg = UploadedImage::new(JPEG_HEADER.to_vec(), "a.jpeg").unwrap();
        assert!(jpeg.data_url().starts_with("data:image/jpeg;base64,"));

        let png = UploadedImage::new(PNG_HEADER.to_vec(), "a.PNG").unwrap();
        assert!(png.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_debug_elides_bytes() {
        let image = UploadedImage::new(JPEG_HEADER.to_vec(), "me.jpg").unwrap();
        let debug = format!("{image:?}");
        assert!(debug.contains("len: 4"));
        assert!(!debug.contains("255"));
    }

    #[test]
    fn test_description_attributes() {
        let description = DescriptionResult::new("young man, smiling,  glasses ,");
        let attrs: Vec<&str> = description.attributes().collect();
        assert_eq!(attrs, vec!["young man", "smiling", "glasses"]);
        assert_eq!(description.as_str(), "young man, smiling,  glasses ,");
    }
}
