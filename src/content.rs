//! The ordered page list: one [`PageItem`] per future PDF page.
//!
//! Insertion order is page order. Ids come from a per-list counter that
//! starts at 1, is never decremented by removals, and is reset only by
//! [`ContentList::clear`].

use crate::pipeline::ingest::{self, IngestReport, SourceFile};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// What a page is made of. Images are the only kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Image,
}

/// Encoded image bytes exactly as ingested, plus the detected format.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    bytes: Arc<[u8]>,
    format: ImageFormat,
}

impl ImagePayload {
    pub fn new(bytes: impl Into<Arc<[u8]>>, format: ImageFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// `data:<mime>;base64,<payload>`: what a host UI needs for a thumbnail.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// One page slated for export.
#[derive(Debug, Clone)]
pub struct PageItem {
    pub id: u64,
    pub kind: PageKind,
    pub image: ImagePayload,
    pub display_name: String,
}

/// A row of the list display: `Page N - name`, with the id to remove it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub id: u64,
    pub page_num: usize,
    pub label: String,
}

/// Ordered collection of pages with a monotonically increasing id counter.
#[derive(Debug, Clone)]
pub struct ContentList {
    items: Vec<PageItem>,
    next_id: u64,
}

impl Default for ContentList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl ContentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one image, returning its freshly assigned id.
    pub fn append(&mut self, display_name: impl Into<String>, image: ImagePayload) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(PageItem {
            id,
            kind: PageKind::Image,
            image,
            display_name: display_name.into(),
        });
        id
    }

    /// Append a batch in iteration order; returns the assigned ids.
    pub fn append_all<I>(&mut self, images: I) -> Vec<u64>
    where
        I: IntoIterator<Item = (String, ImagePayload)>,
    {
        images
            .into_iter()
            .map(|(name, payload)| self.append(name, payload))
            .collect()
    }

    /// Read, filter and probe `files`, then append the accepted ones in
    /// input order. Ids are assigned only after the whole batch finished.
    pub async fn ingest(&mut self, files: Vec<SourceFile>, concurrency: usize) -> IngestReport {
        let outcome = ingest::ingest(files, concurrency).await;
        let ids = self.append_all(outcome.accepted);
        debug!("Appended {} pages, list now holds {}", ids.len(), self.len());
        IngestReport {
            appended_ids: ids,
            rejected: outcome.rejected,
        }
    }

    /// Remove the item with `id`. Returns `false` (and changes nothing) if absent.
    pub fn remove(&mut self, id: u64) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(pos) => {
                // `Vec::remove` shifts, preserving the order of the rest.
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Empty the list and restart ids at 1.
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_id = 1;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PageItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageItem> {
        self.items.iter()
    }

    pub fn get(&self, id: u64) -> Option<&PageItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// "N images selected", or empty for an empty list.
    pub fn count_label(&self) -> String {
        count_label(self.len())
    }

    /// Display rows in page order.
    pub fn entries(&self) -> Vec<ListEntry> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| ListEntry {
                id: item.id,
                page_num: idx + 1,
                label: format!("Page {} - {}", idx + 1, item.display_name),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ContentList {
    type Item = &'a PageItem;
    type IntoIter = std::slice::Iter<'a, PageItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Human-readable selection count with correct pluralisation.
pub fn count_label(n: usize) -> String {
    match n {
        0 => String::new(),
        1 => "1 image selected".to_string(),
        n => format!("{n} images selected"),
    }
}
