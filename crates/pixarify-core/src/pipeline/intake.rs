//! Upload intake before any remote call.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult, Result};
use crate::types::UploadedImage;

/// Accepts uploads into the pipeline.
///
/// Checks:
/// - Payload is not empty
/// - Declared extension is jpg, jpeg or png
/// - Payload is within the configured size limit
///
/// Content is not decoded here; the remote services reject malformed images.
#[derive(Debug, Clone)]
pub struct Intake {
    limits: LimitsConfig,
}

impl Intake {
    /// Create a new intake with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    pub fn max_upload_size_mb(&self) -> u64 {
        self.limits.max_upload_size_mb
    }

    pub fn accept(
        &self,
        bytes: Vec<u8>,
        file_name: impl Into<String>,
    ) -> PipelineResult<UploadedImage> {
        let size = bytes.len() as u64;
        if size > self.limits.max_upload_bytes() {
            return Err(PipelineError::UploadTooLarge {
                size_mb: size / (1024 * 1024),
                max_mb: self.limits.max_upload_size_mb,
            });
        }

        let image = UploadedImage::new(bytes, file_name)?;
        tracing::debug!(
            file_name = image.file_name(),
            format = %image.format(),
            bytes = image.len(),
            "Upload accepted"
        );
        Ok(image)
    }

    /// Read a local file and accept it as an upload.
    pub fn accept_file(&self, path: &Path) -> Result<UploadedImage> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(self.accept(bytes, file_name)?)
    }
}
