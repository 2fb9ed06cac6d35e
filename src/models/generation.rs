use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VgenError};

/// Which backend generation profile a request targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Fast,
    Quality,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Fast => "fast",
            ModelKind::Quality => "quality",
        }
    }
}

/// A displayable image payload: raw bytes plus the mime type they were
/// received or read with.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageData {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        ImageData {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Reads an image from disk, guessing the mime type from the extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| VgenError::InternalError(format!("{}: {}", path.display(), e)))?;
        let mime_type = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/png",
        };
        Ok(ImageData::from_bytes(bytes, mime_type))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Validates that the payload is decodable image data. A corrupt payload
    /// is a render failure, distinct from a request failure.
    pub fn decode(&self) -> Result<image::DynamicImage> {
        image::load_from_memory(&self.bytes)
            .map_err(|e| VgenError::RenderError(format!("unable to decode image data: {}", e)))
    }

    /// Base64 data URL for inline previews.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type, encoded)
    }
}

/// One submission to the generation service. Soft validation only: the
/// request client sends whatever it is given; the controller is what insists
/// on at least one of prompt or image being present.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model_kind: ModelKind,
    pub prompt: String,
    pub image: Option<ImageData>,
}

impl GenerationRequest {
    pub fn new(model_kind: ModelKind, prompt: impl Into<String>) -> Self {
        GenerationRequest {
            model_kind,
            prompt: prompt.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageData) -> Self {
        self.image = Some(image);
        self
    }
}

/// The settled outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub image: ImageData,
    pub elapsed_seconds: f64,
    pub succeeded: bool,
}

/// Structured error body the service returns on failed requests.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
