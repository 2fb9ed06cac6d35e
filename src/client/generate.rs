use std::time::Instant;

use reqwest::multipart::{Form, Part};

use crate::config::ApiConfig;
use crate::error::{Result, VgenError};
use crate::models::{ApiErrorBody, GenerationRequest, GenerationResult, ImageData};

use super::placeholder;

/// Multipart field names expected by the service. The negative prompt is
/// always sent, empty.
const FIELD_IMAGE: &str = "image";
const FIELD_PROMPT: &str = "prompt";
const FIELD_NEGATIVE_PROMPT: &str = "negative_prompt";

/// Sends one generation request and interprets the response. Single attempt,
/// no retry; the only timeout is the one configured on the client.
pub(crate) async fn submit_generation(
    http: &reqwest::Client,
    config: &ApiConfig,
    request: GenerationRequest,
) -> Result<GenerationResult> {
    let url = config.url_for(request.model_kind)?;

    let image = match request.image {
        Some(image) => image,
        None => placeholder::blank_png()?,
    };

    let image_part = Part::bytes(image.bytes)
        .file_name("image.png")
        .mime_str(&image.mime_type)
        .map_err(|e| VgenError::RequestError(format!("invalid image mime type: {}", e)))?;
    let form = Form::new()
        .part(FIELD_IMAGE, image_part)
        .text(FIELD_PROMPT, request.prompt)
        .text(FIELD_NEGATIVE_PROMPT, String::new());

    log::info!(
        "Submitting generation request to {} ({})",
        url,
        request.model_kind.as_str()
    );

    let started = Instant::now();
    let response = http
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| VgenError::RequestError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = decode_error_body(&body, status.as_u16());
        log::warn!("Generation request failed ({}): {}", status, message);
        return Err(VgenError::RequestError(message));
    }

    let mime_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .unwrap_or_else(|| "image/png".to_string());

    // The body is raw image bytes, not JSON.
    let bytes = response
        .bytes()
        .await
        .map_err(|e| VgenError::ResponseError(e.to_string()))?;
    let elapsed_seconds = started.elapsed().as_secs_f64();

    log::info!(
        "Generation completed in {:.2}s ({} bytes, {})",
        elapsed_seconds,
        bytes.len(),
        mime_type
    );

    Ok(GenerationResult {
        image: ImageData::from_bytes(bytes.to_vec(), mime_type),
        elapsed_seconds,
        succeeded: true,
    })
}

/// Failure message, best effort: structured `{"message": ...}` body, then the
/// raw body text, then the bare status code.
fn decode_error_body(body: &str, status: u16) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    format!("HTTP error: {}", status)
}
