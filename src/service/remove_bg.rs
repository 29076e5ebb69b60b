//! HTTP client for remove.bg compatible background removal services

use super::BackgroundRemover;
use crate::config::{ClientConfig, API_KEY_HEADER, IMAGE_FIELD};
use crate::error::{CutoutError, Result};
use crate::types::SelectedImage;
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;

/// Client for a remove.bg compatible HTTP endpoint
///
/// Issues a single multipart POST per invocation with the image bytes in
/// the `image_file` field and the credential in the `X-Api-Key` header.
/// Any non-success status is treated uniformly as failure; the status and
/// response body are preserved in the error for logging only.
#[derive(Debug)]
pub struct RemoveBgClient {
    client: Client,
    config: ClientConfig,
}

impl RemoveBgClient {
    /// Create a new client from a validated configuration
    ///
    /// # Errors
    /// Returns `CutoutError::Network` when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CutoutError::network_error("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Endpoint this client submits to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Build the multipart form carrying the image payload
    fn build_form(image: &SelectedImage) -> Result<multipart::Form> {
        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.mime_type())
            .map_err(|e| CutoutError::internal(format!("Invalid MIME type for upload: {}", e)))?;

        Ok(multipart::Form::new().part(IMAGE_FIELD, part))
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBgClient {
    async fn remove_background(&self, image: &SelectedImage) -> Result<Vec<u8>> {
        log::debug!(
            "Submitting '{}' ({} bytes) to {}",
            image.file_name(),
            image.len(),
            self.config.endpoint
        );

        let form = Self::build_form(image)?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(API_KEY_HEADER, &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                CutoutError::network_error("Failed to reach background removal service", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // Body is logged, never surfaced to the user
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "Background removal service returned HTTP {}: {}",
                status,
                body
            );
            return Err(CutoutError::service_error(
                status.as_u16(),
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CutoutError::network_error("Failed to read service response body", e))?;

        log::debug!("Received {} processed bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ENDPOINT;

    fn test_config() -> ClientConfig {
        ClientConfig::builder()
            .api_key("test-key")
            .build()
            .expect("build test config")
    }

    #[test]
    fn test_client_creation() {
        let client = RemoveBgClient::new(test_config()).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_client_creation_with_timeout() {
        let config = ClientConfig::builder()
            .api_key("test-key")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        assert!(RemoveBgClient::new(config).is_ok());
    }

    #[test]
    fn test_build_form_accepts_sniffed_mime() {
        let image = SelectedImage::new("photo.png", vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
        assert!(RemoveBgClient::build_form(&image).is_ok());
    }

    #[test]
    fn test_build_form_accepts_fallback_mime() {
        // Unrecognized content falls back to application/octet-stream,
        // which must still form a valid part.
        let image = SelectedImage::new("blob.bin", b"opaque".to_vec());
        assert!(RemoveBgClient::build_form(&image).is_ok());
    }
}
