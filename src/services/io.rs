//! Image input/output operations
//!
//! Handles reading input payloads (files or stdin) and writing processed
//! payloads (files or stdout), separate from session business logic.

use crate::error::{CutoutError, Result};
use crate::types::{ProcessedImage, SelectedImage};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Marker used for stdin input and stdout output
pub const STDIO_MARKER: &str = "-";

/// Suffix appended to derived output file names
const OUTPUT_SUFFIX: &str = "_cutout";

/// Service for reading inputs and writing outputs
pub struct ImageIOService;

impl ImageIOService {
    /// Read an input into memory; `-` reads stdin
    ///
    /// # Errors
    /// Returns `CutoutError::Io` when the file or stream cannot be read.
    pub async fn read_input(input: &str) -> Result<SelectedImage> {
        if input == STDIO_MARKER {
            use tokio::io::AsyncReadExt;

            let mut buffer = Vec::new();
            tokio::io::stdin().read_to_end(&mut buffer).await?;
            return Ok(SelectedImage::new("stdin", buffer));
        }

        SelectedImage::from_file(input).await
    }

    /// Write a processed payload; `-` writes stdout
    ///
    /// # Errors
    /// Returns `CutoutError::Io` when the file or stream cannot be written.
    pub fn write_output(output: &Path, image: &ProcessedImage) -> Result<()> {
        if output.as_os_str() == STDIO_MARKER {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(image.bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CutoutError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        image.save(output)
    }

    /// Derive the output path for an input
    ///
    /// `extension` names the format of the payload being written (see
    /// [`ProcessedImage::extension`]), so the file name matches the bytes.
    /// With no explicit output the result lands next to the input as
    /// `<stem>_cutout.<extension>`. An explicit output naming an existing
    /// directory gets the derived file name inside it; anything else is
    /// used as-is.
    #[must_use]
    pub fn derive_output_path(input: &str, output: Option<&Path>, extension: &str) -> PathBuf {
        let input_path = Path::new(input);
        let stem = if input == STDIO_MARKER {
            "stdin".to_string()
        } else {
            input_path
                .file_stem()
                .map_or_else(|| "image".to_string(), |s| s.to_string_lossy().into_owned())
        };
        let derived_name = format!("{}{}.{}", stem, OUTPUT_SUFFIX, extension);

        match output {
            Some(path) if path.is_dir() => path.join(derived_name),
            Some(path) => path.to_path_buf(),
            None => input_path.with_file_name(derived_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut cursor, image::ImageFormat::Png)
            .expect("encode test PNG");
        buffer
    }

    #[tokio::test]
    async fn test_read_input_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("in.png");
        std::fs::write(&path, png_bytes()).unwrap();

        let selected = ImageIOService::read_input(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(selected.file_name(), "in.png");
        assert_eq!(selected.mime_type(), "image/png");
    }

    #[test]
    fn test_write_output_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.png");

        let processed = ProcessedImage::from_bytes(png_bytes()).unwrap();
        ImageIOService::write_output(&path, &processed).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_derive_output_path_sibling_default() {
        let derived = ImageIOService::derive_output_path("/photos/cat.jpg", None, "png");
        assert_eq!(derived, PathBuf::from("/photos/cat_cutout.png"));
    }

    #[test]
    fn test_derive_output_path_extension_follows_payload() {
        let derived = ImageIOService::derive_output_path("/photos/cat.png", None, "jpg");
        assert_eq!(derived, PathBuf::from("/photos/cat_cutout.jpg"));
    }

    #[test]
    fn test_derive_output_path_explicit_file() {
        let derived = ImageIOService::derive_output_path(
            "/photos/cat.jpg",
            Some(Path::new("/tmp/out.png")),
            "png",
        );
        assert_eq!(derived, PathBuf::from("/tmp/out.png"));
    }

    #[test]
    fn test_derive_output_path_into_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let derived =
            ImageIOService::derive_output_path("/photos/cat.jpg", Some(dir.path()), "png");
        assert_eq!(derived, dir.path().join("cat_cutout.png"));
    }

    #[test]
    fn test_derive_output_path_stdin() {
        let derived = ImageIOService::derive_output_path("-", None, "png");
        assert_eq!(derived, PathBuf::from("stdin_cutout.png"));
    }
}
