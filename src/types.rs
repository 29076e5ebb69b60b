//! Core types for background removal client operations

use crate::error::Result;
use base64::Engine as _;
use image::GenericImageView;
use std::path::Path;

/// MIME type used when content sniffing cannot identify the payload
const FALLBACK_MIME: &str = "application/octet-stream";

/// Encode a payload as a `data:` URL suitable for inline display
fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// A user-selected input image held fully in memory
///
/// Created by [`RemovalSession::select_image`](crate::session::RemovalSession::select_image)
/// or directly from a file. No size or type validation is performed on the
/// contents; the MIME type is sniffed from the bytes purely for display
/// encoding and the multipart upload.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    file_name: String,
    bytes: Vec<u8>,
    mime_type: String,
}

impl SelectedImage {
    /// Create a selected image from a file name and its full contents
    #[must_use]
    pub fn new<S: Into<String>>(file_name: S, bytes: Vec<u8>) -> Self {
        let mime_type = infer::get(&bytes)
            .map_or(FALLBACK_MIME, |kind| kind.mime_type())
            .to_string();

        Self {
            file_name: file_name.into(),
            bytes,
            mime_type,
        }
    }

    /// Read a file fully into memory as a selected image
    ///
    /// # Errors
    /// Returns `CutoutError::Io` when the file cannot be read.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let bytes = tokio::fs::read(path_ref)
            .await
            .map_err(|e| crate::error::CutoutError::file_io_error("read image file", path_ref, &e))?;

        let file_name = path_ref
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self::new(file_name, bytes))
    }

    /// File name the image was selected under
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw bytes of the selected file
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sniffed MIME type of the contents
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Payload size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode the contents as a base64 `data:` URL for inline display
    #[must_use]
    pub fn data_url(&self) -> String {
        to_data_url(&self.mime_type, &self.bytes)
    }
}

/// The image payload returned by the background removal service
///
/// The bytes are decoded once on construction to verify the response is a
/// displayable image and to capture its dimensions; the original encoded
/// payload is kept untouched for saving and display.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    bytes: Vec<u8>,
    dimensions: (u32, u32),
    format: image::ImageFormat,
}

impl ProcessedImage {
    /// Decode a service response payload into a processed image
    ///
    /// # Errors
    /// Returns `CutoutError::Image` when the payload is not a decodable image.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes)?;
        let decoded = image::load_from_memory(&bytes)?;
        let dimensions = decoded.dimensions();

        Ok(Self {
            bytes,
            dimensions,
            format,
        })
    }

    /// Raw encoded bytes as returned by the service
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pixel dimensions of the decoded image
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Detected image format of the payload
    #[must_use]
    pub fn format(&self) -> image::ImageFormat {
        self.format
    }

    /// Preferred file extension for the payload's format
    ///
    /// Used when deriving output file names, so the written file's name
    /// matches the bytes actually returned by the service.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }

    /// Encode the payload as a base64 `data:` URL for inline display
    #[must_use]
    pub fn data_url(&self) -> String {
        to_data_url(self.format.to_mime_type(), &self.bytes)
    }

    /// Write the payload to a file as-is
    ///
    /// # Errors
    /// Returns `CutoutError::Io` when the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        std::fs::write(path_ref, &self.bytes).map_err(|e| {
            crate::error::CutoutError::file_io_error("write output image", path_ref, &e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut cursor, image::ImageFormat::Png)
            .expect("encode test PNG");
        buffer
    }

    #[test]
    fn test_selected_image_sniffs_png() {
        let selected = SelectedImage::new("photo.png", png_bytes(4, 4));
        assert_eq!(selected.file_name(), "photo.png");
        assert_eq!(selected.mime_type(), "image/png");
        assert!(!selected.is_empty());
    }

    #[test]
    fn test_selected_image_unknown_content_falls_back() {
        let selected = SelectedImage::new("note.txt", b"not an image".to_vec());
        assert_eq!(selected.mime_type(), FALLBACK_MIME);
    }

    #[test]
    fn test_selected_image_data_url_prefix() {
        let selected = SelectedImage::new("photo.png", png_bytes(2, 2));
        let url = selected.data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }

    #[tokio::test]
    async fn test_selected_image_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("input.png");
        std::fs::write(&path, png_bytes(3, 3)).unwrap();

        let selected = SelectedImage::from_file(&path).await.unwrap();
        assert_eq!(selected.file_name(), "input.png");
        assert_eq!(selected.mime_type(), "image/png");
    }

    #[tokio::test]
    async fn test_selected_image_from_missing_file() {
        let result = SelectedImage::from_file("/nonexistent/input.png").await;
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("read image file"));
    }

    #[test]
    fn test_processed_image_decodes_dimensions() {
        let processed = ProcessedImage::from_bytes(png_bytes(5, 7)).unwrap();
        assert_eq!(processed.dimensions(), (5, 7));
        assert_eq!(processed.format(), image::ImageFormat::Png);
        assert!(processed.data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_processed_image_extension_follows_payload_format() {
        let png = ProcessedImage::from_bytes(png_bytes(2, 2)).unwrap();
        assert_eq!(png.extension(), "png");

        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([10, 20, 30, 255]),
        ))
        .to_rgb8()
        .write_to(&mut cursor, image::ImageFormat::Jpeg)
        .expect("encode test JPEG");

        let jpeg = ProcessedImage::from_bytes(buffer).unwrap();
        assert_eq!(jpeg.format(), image::ImageFormat::Jpeg);
        assert_eq!(jpeg.extension(), "jpg");
    }

    #[test]
    fn test_processed_image_rejects_garbage() {
        let result = ProcessedImage::from_bytes(b"definitely not an image".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn test_processed_image_save_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("output.png");

        let payload = png_bytes(6, 6);
        let processed = ProcessedImage::from_bytes(payload.clone()).unwrap();
        processed.save(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), payload);
    }
}
