//! Page lifetime and request cancellation.
//!
//! Each page owns a [`PageLifetime`]. Requests issued on behalf of the page
//! go through [`PageLifetime::run`]; once the page is left (`cancel`), any
//! request still in flight resolves to [`ApiError::Cancelled`] and its result
//! is never applied to page state.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::services::api::ApiError;

#[derive(Debug, Clone)]
pub struct PageLifetime {
    cancelled: Arc<watch::Sender<bool>>,
}

impl Default for PageLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLifetime {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(sender),
        }
    }

    /// Mark the page as gone. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.send_replace(true) {
            debug!("Page lifetime cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Race `request` against cancellation of this page
    pub async fn run<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let mut receiver = self.cancelled.subscribe();
        if *receiver.borrow_and_update() {
            return Err(ApiError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = receiver.wait_for(|cancelled| *cancelled) => Err(ApiError::Cancelled),
            result = request => result,
        }
    }
}
