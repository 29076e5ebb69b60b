//! Background removal service implementations
//!
//! The [`BackgroundRemover`] trait is the seam between the session state
//! machine and the external HTTP service, allowing the service to be
//! mocked in tests.

pub mod remove_bg;
pub mod test_utils;

use crate::error::Result;
use crate::types::SelectedImage;
use async_trait::async_trait;

/// External collaborator that removes the background from an image
///
/// Implementations perform exactly one attempt per invocation: no retry,
/// no internal rescheduling. A returned error is terminal for that attempt.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Submit an image payload and return the processed image bytes
    ///
    /// # Errors
    /// Returns `CutoutError::Network` for transport failures and
    /// `CutoutError::Service` for any non-success HTTP status.
    async fn remove_background(&self, image: &SelectedImage) -> Result<Vec<u8>>;
}

pub use remove_bg::RemoveBgClient;
