//! Mock service implementations for testing session behavior
//!
//! These mocks simulate the background removal service without network
//! access, so state transitions can be verified against simulated success,
//! HTTP failure, and transport failure.

use super::BackgroundRemover;
use crate::error::{CutoutError, Result};
use crate::types::SelectedImage;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the mock service should do on each invocation
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Succeed with the given payload
    Success(Vec<u8>),
    /// Fail with the given HTTP status
    HttpStatus(u16),
    /// Fail with a transport-level error
    NetworkError(String),
}

/// Mock background removal service with scripted responses
#[derive(Debug)]
pub struct MockRemover {
    response: MockResponse,
    calls: AtomicUsize,
    /// File names submitted, for verification in tests
    submitted: Mutex<Vec<String>>,
}

impl MockRemover {
    /// Create a mock that succeeds with the given payload
    #[must_use]
    pub fn succeeding(payload: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            response: MockResponse::Success(payload),
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        })
    }

    /// Create a mock that fails with the given HTTP status
    #[must_use]
    pub fn failing_with_status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            response: MockResponse::HttpStatus(status),
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        })
    }

    /// Create a mock that fails with a network error
    #[must_use]
    pub fn failing_with_network_error<S: Into<String>>(message: S) -> Arc<Self> {
        Arc::new(Self {
            response: MockResponse::NetworkError(message.into()),
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        })
    }

    /// Number of times the service was invoked
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// File names submitted so far
    #[must_use]
    pub fn submitted_files(&self) -> Vec<String> {
        self.submitted.lock().map(|names| names.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BackgroundRemover for MockRemover {
    async fn remove_background(&self, image: &SelectedImage) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut names) = self.submitted.lock() {
            names.push(image.file_name().to_string());
        }

        match &self.response {
            MockResponse::Success(payload) => Ok(payload.clone()),
            MockResponse::HttpStatus(status) => {
                Err(CutoutError::service_error(*status, "simulated service failure"))
            },
            MockResponse::NetworkError(message) => {
                Err(CutoutError::network_error("simulated transport failure", message))
            },
        }
    }
}

/// `BackgroundRemover` passthrough so `Arc<MockRemover>` can be boxed into
/// a session while the test keeps a handle for verification.
#[async_trait]
impl BackgroundRemover for Arc<MockRemover> {
    async fn remove_background(&self, image: &SelectedImage) -> Result<Vec<u8>> {
        self.as_ref().remove_background(image).await
    }
}
