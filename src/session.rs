//! Session state: the content list plus everything a front end renders
//! around it.
//!
//! A [`Session`] owns one [`ContentList`], a busy flag that disables the
//! actions while an export runs, and the current [`StatusMessage`]. Front
//! ends call the mutating methods from their event handlers and re-read
//! [`Session::entries`], [`Session::count_label`],
//! [`Session::actions_enabled`] and [`Session::status_at`] afterwards; those
//! readers never mutate.

use crate::config::ExportConfig;
use crate::content::{ContentList, ListEntry};
use crate::error::ExportError;
use crate::export;
use crate::output::ExportOutput;
use crate::pipeline::ingest::{IngestReport, SourceFile, DEFAULT_INGEST_CONCURRENCY};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const CLEARED_MESSAGE: &str = "All content cleared!";
pub const CONVERTING_MESSAGE: &str = "Converting to PDF...";
pub const SUCCESS_MESSAGE: &str = "PDF created successfully!";
pub const FAILURE_MESSAGE: &str = "Error creating PDF. Please try again.";

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    /// How long a message of this kind stays up. Errors stay until replaced.
    pub fn default_duration(self) -> Option<Duration> {
        match self {
            StatusKind::Info => Some(Duration::from_secs(2)),
            StatusKind::Success => Some(Duration::from_secs(4)),
            StatusKind::Error => None,
        }
    }
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub posted_at: Instant,
    /// `None` means the message stays until overwritten.
    pub ttl: Option<Duration>,
}

impl StatusMessage {
    /// A message that auto-dismisses after its kind's default duration.
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            posted_at: Instant::now(),
            ttl: kind.default_duration(),
        }
    }

    /// A message that stays until overwritten, whatever its kind.
    pub fn persistent(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            ttl: None,
            ..Self::new(kind, text)
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_duration_since(self.posted_at) >= ttl)
    }
}

/// One user's working state.
#[derive(Debug)]
pub struct Session {
    list: ContentList,
    busy: bool,
    status: Option<StatusMessage>,
    ingest_concurrency: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            list: ContentList::new(),
            busy: false,
            status: None,
            ingest_concurrency: DEFAULT_INGEST_CONCURRENCY,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many files are read and probed at once during ingest.
    pub fn with_ingest_concurrency(mut self, n: usize) -> Self {
        self.ingest_concurrency = n.max(1);
        self
    }

    pub fn list(&self) -> &ContentList {
        &self.list
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Add a batch of files (selection or drop) to the end of the list.
    pub async fn ingest(&mut self, files: Vec<SourceFile>) -> IngestReport {
        let report = self.list.ingest(files, self.ingest_concurrency).await;
        debug!("{}", self.count_label());
        report
    }

    /// Remove a page by id. Unknown ids are ignored.
    pub fn remove(&mut self, id: u64) -> bool {
        let removed = self.list.remove(id);
        if !removed {
            debug!("remove({}) ignored: no such page", id);
        }
        removed
    }

    /// Drop every page, restart ids at 1 and post a short confirmation.
    pub fn clear(&mut self) {
        self.list.clear();
        self.status = Some(StatusMessage::new(StatusKind::Info, CLEARED_MESSAGE));
        info!("Content list cleared");
    }

    /// Export the current list to memory.
    ///
    /// Does nothing on an empty list (the action is disabled) and returns
    /// [`ExportError::EmptyList`]. On failure the status shows one generic
    /// message; the detailed error is returned and logged. The busy flag is
    /// cleared on every path.
    pub async fn convert(&mut self, config: &ExportConfig) -> Result<ExportOutput, ExportError> {
        self.run_export(config, None).await
    }

    /// Like [`Session::convert`], and also writes `<dir>/<file_name>`.
    pub async fn convert_to_dir(
        &mut self,
        dir: impl AsRef<Path>,
        config: &ExportConfig,
    ) -> Result<ExportOutput, ExportError> {
        self.run_export(config, Some(dir.as_ref())).await
    }

    async fn run_export(
        &mut self,
        config: &ExportConfig,
        dir: Option<&Path>,
    ) -> Result<ExportOutput, ExportError> {
        if self.list.is_empty() {
            return Err(ExportError::EmptyList);
        }

        self.busy = true;
        self.status = Some(StatusMessage::persistent(
            StatusKind::Info,
            CONVERTING_MESSAGE,
        ));

        let result = match dir {
            Some(dir) => export::export_to_dir(&self.list, dir, config).await,
            None => export::export(&self.list, config).await,
        };

        self.busy = false;
        self.status = Some(match result {
            Ok(_) => StatusMessage::new(StatusKind::Success, SUCCESS_MESSAGE),
            Err(_) => StatusMessage::new(StatusKind::Error, FAILURE_MESSAGE),
        });
        result
    }

    // ── Readers ──────────────────────────────────────────────────────────

    pub fn entries(&self) -> Vec<ListEntry> {
        self.list.entries()
    }

    pub fn count(&self) -> usize {
        self.list.len()
    }

    pub fn count_label(&self) -> String {
        self.list.count_label()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether convert/clear are clickable.
    pub fn actions_enabled(&self) -> bool {
        !self.busy && !self.list.is_empty()
    }

    /// The status to show at `now`, if it has not auto-dismissed.
    pub fn status_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|s| !s.is_expired_at(now))
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_per_kind() {
        assert_eq!(
            StatusKind::Info.default_duration(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(
            StatusKind::Success.default_duration(),
            Some(Duration::from_secs(4))
        );
        assert_eq!(StatusKind::Error.default_duration(), None);
    }

    #[test]
    fn info_expires_after_two_seconds() {
        let msg = StatusMessage::new(StatusKind::Info, "hi");
        let t0 = msg.posted_at;
        assert!(!msg.is_expired_at(t0 + Duration::from_millis(1999)));
        assert!(msg.is_expired_at(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn error_never_expires() {
        let msg = StatusMessage::new(StatusKind::Error, "boom");
        assert!(!msg.is_expired_at(msg.posted_at + Duration::from_secs(3600)));
    }

    #[test]
    fn persistent_info_never_expires() {
        let msg = StatusMessage::persistent(StatusKind::Info, "working");
        assert!(!msg.is_expired_at(msg.posted_at + Duration::from_secs(60)));
    }

    #[test]
    fn fresh_session_has_actions_disabled() {
        let session = Session::new();
        assert!(!session.actions_enabled());
        assert_eq!(session.count_label(), "");
        assert!(session.status().is_none());
    }

    #[test]
    fn clear_posts_auto_dismissing_info() {
        let mut session = Session::new();
        session.clear();
        let now = Instant::now();
        let status = session.status_at(now).expect("status posted");
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(status.text, CLEARED_MESSAGE);
        assert!(session.status_at(now + Duration::from_secs(3)).is_none());
    }

    #[test]
    fn convert_on_empty_list_changes_nothing() {
        let mut session = Session::new();
        let result = tokio_test::block_on(session.convert(&ExportConfig::default()));
        assert!(matches!(result, Err(ExportError::EmptyList)));
        assert!(session.status().is_none());
        assert!(!session.is_busy());
    }
}
