#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Cutout Background Removal Client
//!
//! A Rust client for remove.bg compatible background removal services.
//! There is no local image processing: the selected image is read fully
//! into memory, submitted as a single multipart POST with a credential
//! header, and the returned payload is held as the processed image.
//!
//! ## Features
//!
//! - **Session state machine**: select-image, remove-background, reset
//!   with explicit loading/error state transitions
//! - **Service seam**: the [`BackgroundRemover`] trait separates the
//!   workflow from the HTTP client so the service can be mocked in tests
//! - **Externalized credential**: resolved from an explicit value, the
//!   `CUTOUT_API_KEY` environment variable, or a user config file
//! - **Inline display encoding**: selected and processed images expose
//!   base64 `data:` URLs
//! - **CLI Integration**: optional command-line interface (enable with
//!   the `cli` feature, on by default)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cutout::{remove_background_from_file, ClientConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::builder()
//!     .api_key("your-api-key")
//!     .build()?;
//!
//! let processed = remove_background_from_file("input.jpg", &config).await?;
//! processed.save("output.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Session Usage
//!
//! For interactive frontends that need the full state machine:
//!
//! ```rust,no_run
//! use cutout::{ClientConfig, RemovalSession, SessionState};
//!
//! # async fn example(bytes: Vec<u8>) -> anyhow::Result<()> {
//! let config = ClientConfig::builder().api_key("your-api-key").build()?;
//! let mut session = RemovalSession::with_client(config)?;
//!
//! session.select_image("photo.jpg", bytes);
//! match session.remove_background().await {
//!     SessionState::Done => {
//!         let _url = session.processed().map(|p| p.data_url());
//!     },
//!     SessionState::Failed => {
//!         let _message = session.error(); // fixed user-facing text
//!     },
//!     _ => {},
//! }
//! session.reset();
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod service;
pub mod services;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use config::{ClientConfig, ClientConfigBuilder, FileConfig, DEFAULT_ENDPOINT};
pub use error::{CutoutError, Result, FAILURE_MESSAGE};
pub use service::{BackgroundRemover, RemoveBgClient};
pub use services::ImageIOService;
pub use session::{RemovalSession, SessionState};
pub use types::{ProcessedImage, SelectedImage};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Remove the background from an image provided as bytes
///
/// Suitable for web servers and memory-based processing where files
/// aren't available. Performs exactly one service attempt and returns the
/// structured error on failure; callers that need the fixed user-facing
/// message can use [`CutoutError::user_message`].
///
/// # Arguments
///
/// * `image_bytes` - Raw image data as bytes
/// * `config` - Client configuration (credential, endpoint, timeout)
///
/// # Examples
///
/// ```rust,no_run
/// use cutout::{remove_background_from_bytes, ClientConfig};
///
/// # async fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
/// let config = ClientConfig::builder().api_key("your-api-key").build()?;
/// let processed = remove_background_from_bytes(&upload_bytes, &config).await?;
/// let display_url = processed.data_url();
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_bytes(
    image_bytes: &[u8],
    config: &ClientConfig,
) -> Result<ProcessedImage> {
    let image = SelectedImage::new("image", image_bytes.to_vec());
    remove_background_from_selected(&image, config).await
}

/// Remove the background from an image file
///
/// Reads the file fully into memory and performs exactly one service
/// attempt.
pub async fn remove_background_from_file<P: AsRef<std::path::Path>>(
    path: P,
    config: &ClientConfig,
) -> Result<ProcessedImage> {
    let image = SelectedImage::from_file(path).await?;
    remove_background_from_selected(&image, config).await
}

/// Remove the background from an async reader stream
///
/// Accepts any async readable stream, making it suitable for processing
/// images from network streams or any other async data source.
pub async fn remove_background_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &ClientConfig,
) -> Result<ProcessedImage> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer).await?;

    remove_background_from_bytes(&buffer, config).await
}

/// Shared single-attempt path for the convenience functions
async fn remove_background_from_selected(
    image: &SelectedImage,
    config: &ClientConfig,
) -> Result<ProcessedImage> {
    let client = RemoveBgClient::new(config.clone())?;
    let bytes = client.remove_background(image).await?;
    ProcessedImage::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_reexport_applies_defaults() {
        let config = ClientConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.timeout.is_none());
    }
}
