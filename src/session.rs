//! Removal session state machine
//!
//! [`RemovalSession`] is the single stateful component of the client. It
//! holds the four state fields (selected image, processed image, loading
//! flag, error message) and exposes the three user-triggered operations:
//! select-image, remove-background, reset.
//!
//! State machine: Idle → Selected → (Processing → Done | Processing →
//! Failed) → Idle on reset, or back to Selected on re-selection.
//!
//! Invariants:
//! - at most one of {loading, error-present} is true at any time
//! - the processed image is present only if the most recent service call
//!   succeeded and no reset or re-selection happened since

use crate::config::ClientConfig;
use crate::error::Result;
use crate::service::{BackgroundRemover, RemoveBgClient};
use crate::types::{ProcessedImage, SelectedImage};
use std::path::Path;
use tracing::{debug, info, warn};

/// Observable state of a removal session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image selected
    Idle,
    /// An image is selected and ready to submit
    Selected,
    /// A request to the service is in flight
    Processing,
    /// The most recent attempt succeeded
    Done,
    /// The most recent attempt failed; retry is allowed
    Failed,
}

/// Sets the loading flag on creation and clears it when dropped
///
/// `remove_background` can be cancelled by dropping its future (timeouts,
/// `select!`); drop is an exit path like any other, so the flag must not
/// outlive the request it describes.
struct LoadingGuard<'a> {
    loading: &'a mut bool,
}

impl<'a> LoadingGuard<'a> {
    fn engage(loading: &'a mut bool) -> Self {
        *loading = true;
        Self { loading }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.loading = false;
    }
}

/// Stateful controller for the image-submission workflow
pub struct RemovalSession {
    service: Box<dyn BackgroundRemover>,
    selected: Option<SelectedImage>,
    processed: Option<ProcessedImage>,
    loading: bool,
    error: Option<String>,
}

impl RemovalSession {
    /// Create a session around any background removal service
    #[must_use]
    pub fn new(service: Box<dyn BackgroundRemover>) -> Self {
        Self {
            service,
            selected: None,
            processed: None,
            loading: false,
            error: None,
        }
    }

    /// Create a session backed by the remove.bg HTTP client
    ///
    /// # Errors
    /// Returns `CutoutError::Network` when the HTTP client cannot be built.
    pub fn with_client(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(Box::new(RemoveBgClient::new(config)?)))
    }

    /// Select an image from an in-memory payload
    ///
    /// Overwrites any previous selection and clears the processed image and
    /// error. No size or type validation is performed.
    pub fn select_image<S: Into<String>>(&mut self, file_name: S, bytes: Vec<u8>) {
        self.select_image_loaded(SelectedImage::new(file_name, bytes));
    }

    /// Read a file fully into memory and select it
    ///
    /// # Errors
    /// Returns `CutoutError::Io` when the file cannot be read; the session
    /// state is left unchanged in that case.
    pub async fn select_image_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let image = SelectedImage::from_file(path).await?;
        self.select_image_loaded(image);
        Ok(())
    }

    /// Select an already-loaded image
    pub fn select_image_loaded(&mut self, image: SelectedImage) {
        debug!(
            file = %image.file_name(),
            size_bytes = image.len(),
            "Image selected"
        );
        self.selected = Some(image);
        self.processed = None;
        self.error = None;
    }

    /// Submit the selected image to the background removal service
    ///
    /// Exactly one attempt per invocation: no retry, no cancellation. A
    /// no-op when nothing is selected or a request is already in flight.
    /// On success the processed image is replaced; on any failure the
    /// error message is set and the processed image is left untouched.
    /// The loading flag is cleared on every exit path, including when the
    /// returned future is dropped before the request resolves.
    pub async fn remove_background(&mut self) -> SessionState {
        if self.selected.is_none() {
            debug!("remove_background invoked without a selection; ignoring");
            return self.state();
        }
        if self.loading {
            debug!("remove_background invoked while a request is in flight; ignoring");
            return self.state();
        }

        self.error = None;

        let outcome = {
            let _guard = LoadingGuard::engage(&mut self.loading);

            // No await between the checks above and here, so the selection
            // cannot have changed.
            if let Some(image) = self.selected.as_ref() {
                Self::attempt(self.service.as_ref(), image).await
            } else {
                Err(crate::error::CutoutError::internal("no image selected"))
            }
        };

        match outcome {
            Ok(processed) => {
                info!(
                    size_bytes = processed.len(),
                    width = processed.dimensions().0,
                    height = processed.dimensions().1,
                    "Background removed"
                );
                self.processed = Some(processed);
            },
            Err(e) => {
                warn!(error = %e, "Background removal attempt failed");
                self.error = Some(e.user_message().to_string());
            },
        }

        self.state()
    }

    /// Clear all state back to the initial empty session
    pub fn reset(&mut self) {
        debug!("Session reset");
        self.selected = None;
        self.processed = None;
        self.loading = false;
        self.error = None;
    }

    /// Single service attempt: submit, then decode the response payload
    async fn attempt(
        service: &dyn BackgroundRemover,
        image: &SelectedImage,
    ) -> Result<ProcessedImage> {
        let bytes = service.remove_background(image).await?;
        ProcessedImage::from_bytes(bytes)
    }

    /// Currently selected image, if any
    #[must_use]
    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    /// Processed image from the most recent successful attempt, if any
    #[must_use]
    pub fn processed(&self) -> Option<&ProcessedImage> {
        self.processed.as_ref()
    }

    /// Whether a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// User-facing error message from the most recent failed attempt
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Derive the observable session state from the state fields
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.loading {
            SessionState::Processing
        } else if self.error.is_some() {
            SessionState::Failed
        } else if self.processed.is_some() {
            SessionState::Done
        } else if self.selected.is_some() {
            SessionState::Selected
        } else {
            SessionState::Idle
        }
    }
}
