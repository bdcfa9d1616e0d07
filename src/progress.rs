//! Progress-callback trait for per-page export events.
//!
//! Inject an [`Arc<dyn ExportProgressCallback>`] via
//! [`crate::config::ExportConfigBuilder::progress_callback`] to receive
//! events as the sequencer places each page.
//!
//! # Example
//!
//! ```rust
//! use imgs2pdf::{ExportProgressCallback, ExportConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     placed: AtomicUsize,
//! }
//!
//! impl ExportProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, jpeg_bytes: usize) {
//!         self.placed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} placed ({} bytes)", page_num, total_pages, jpeg_bytes);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { placed: AtomicUsize::new(0) });
//!
//! let config = ExportConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExportProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the export sequencer as it processes each page.
///
/// Pages are placed strictly one after another, so events for page `n + 1`
/// never arrive before `on_page_complete` for page `n`. All methods have
/// default no-op implementations.
pub trait ExportProgressCallback: Send + Sync {
    /// Called once before the first page is decoded.
    fn on_export_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page's image is decoded.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `total_pages`: pages in this export
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page's image has been placed.
    ///
    /// `jpeg_bytes` is the size of the embedded JPEG stream.
    fn on_page_complete(&self, page_num: usize, total_pages: usize, jpeg_bytes: usize) {
        let _ = (page_num, total_pages, jpeg_bytes);
    }

    /// Called when a page fails. The export aborts right after this event.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once when the export ends, successfully or not.
    ///
    /// `succeeded` is false when the export aborted; no document was produced.
    fn on_export_complete(&self, total_pages: usize, succeeded: bool) {
        let _ = (total_pages, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExportProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExportConfig`].
pub type ProgressCallback = Arc<dyn ExportProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        started_total: AtomicUsize,
        succeeded: AtomicBool,
    }

    impl ExportProgressCallback for TrackingCallback {
        fn on_export_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_start(&self, _page_num: usize, _total_pages: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _jpeg_bytes: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_export_complete(&self, _total_pages: usize, succeeded: bool) {
            self.succeeded.store(succeeded, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_export_start(5);
        cb.on_page_start(1, 5);
        cb.on_page_complete(1, 5, 42);
        cb.on_page_error(2, 5, "some error");
        cb.on_export_complete(5, false);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_export_start(2);
        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);

        tracker.on_page_start(1, 2);
        tracker.on_page_complete(1, 2, 1000);
        tracker.on_page_start(2, 2);
        tracker.on_page_error(2, 2, "truncated PNG");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);

        tracker.on_export_complete(2, false);
        assert!(!tracker.succeeded.load(Ordering::SeqCst));
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ExportProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_export_start(10);
        cb.on_page_start(1, 10);
        cb.on_page_complete(1, 10, 512);
    }
}
