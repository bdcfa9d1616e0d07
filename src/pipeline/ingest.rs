//! File ingestion: turn raw file blobs into embeddable image payloads.
//!
//! Files are filtered by declared media type before anything is read. The
//! survivors are read and probed concurrently, but results are gathered with
//! `buffered` (not `buffer_unordered`) so the batch comes back in selection
//! order no matter which file finishes first.

use crate::content::ImagePayload;
use crate::error::IngestError;
use futures::stream::{self, StreamExt};
use image::{ImageFormat, ImageReader};
use serde::Serialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of files read and probed at once.
pub const DEFAULT_INGEST_CONCURRENCY: usize = 8;

/// A file offered for ingestion: a name, its declared media type, and
/// where its bytes live.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub media_type: Option<String>,
    source: FileSource,
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl SourceFile {
    /// A file on disk. The media type is inferred from the extension; the
    /// bytes are not read until [`ingest`] runs.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            media_type: media_type_for_path(&path),
            source: FileSource::Path(path),
        }
    }

    /// An in-memory blob with a caller-declared media type.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type,
            source: FileSource::Bytes(bytes.into()),
        }
    }

    /// True when the declared media type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().starts_with("image/"))
    }
}

/// Media type implied by a path's extension, if it is a known image format.
pub fn media_type_for_path(path: &Path) -> Option<String> {
    ImageFormat::from_path(path)
        .ok()
        .map(|f| f.to_mime_type().to_string())
}

/// Raw result of [`ingest`]: accepted payloads in input order, plus rejects.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub accepted: Vec<(String, ImagePayload)>,
    pub rejected: Vec<IngestError>,
}

/// What an ingest batch did to the content list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Ids assigned to accepted files, in input order.
    pub appended_ids: Vec<u64>,
    /// Files that were skipped, in input order.
    pub rejected: Vec<IngestError>,
}

impl IngestReport {
    pub fn accepted_count(&self) -> usize {
        self.appended_ids.len()
    }
}

/// Filter, read and probe a batch of files.
///
/// Up to `concurrency` files are in flight at once. The returned `accepted`
/// vector is in the same order as `files`.
pub async fn ingest(files: Vec<SourceFile>, concurrency: usize) -> IngestOutcome {
    let total = files.len();
    let results: Vec<Result<(String, ImagePayload), IngestError>> =
        stream::iter(files.into_iter().map(load_one))
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut outcome = IngestOutcome::default();
    for result in results {
        match result {
            Ok(item) => outcome.accepted.push(item),
            Err(e) => {
                warn!("Skipping file: {}", e);
                outcome.rejected.push(e);
            }
        }
    }
    debug!(
        "Ingested {}/{} files ({} rejected)",
        outcome.accepted.len(),
        total,
        outcome.rejected.len()
    );
    outcome
}

async fn load_one(file: SourceFile) -> Result<(String, ImagePayload), IngestError> {
    if !file.is_image() {
        return Err(IngestError::NotAnImage {
            name: file.name,
            media_type: file.media_type,
        });
    }

    let SourceFile { name, source, .. } = file;
    let bytes: Arc<[u8]> = match source {
        FileSource::Bytes(b) => b,
        FileSource::Path(path) => tokio::fs::read(&path)
            .await
            .map_err(|e| IngestError::ReadFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?
            .into(),
    };

    let probe_bytes = Arc::clone(&bytes);
    let format = tokio::task::spawn_blocking(move || probe(&probe_bytes))
        .await
        .map_err(|e| IngestError::DecodeFailed {
            name: name.clone(),
            detail: format!("probe task panicked: {e}"),
        })?
        .map_err(|detail| IngestError::DecodeFailed {
            name: name.clone(),
            detail,
        })?;

    debug!("Loaded '{}' as {:?} ({} bytes)", name, format, bytes.len());
    Ok((name, ImagePayload::new(bytes, format)))
}

/// Sniff the format from the content and check the header carries real
/// dimensions. Full pixel decoding is left to export.
fn probe(bytes: &[u8]) -> Result<ImageFormat, String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    let format = reader
        .format()
        .ok_or_else(|| "unrecognised image format".to_string())?;
    let (w, h) = reader.into_dimensions().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 {
        return Err(format!("image has no area ({w}×{h})"));
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 20, 30])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode png");
        buf
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(
            media_type_for_path(Path::new("a/b/photo.JPG")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            media_type_for_path(Path::new("scan.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(media_type_for_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn is_image_checks_prefix() {
        let f = SourceFile::from_bytes("x", Some("IMAGE/PNG".into()), vec![]);
        assert!(f.is_image());
        let f = SourceFile::from_bytes("x", Some("application/pdf".into()), vec![]);
        assert!(!f.is_image());
        let f = SourceFile::from_bytes("x", None, vec![]);
        assert!(!f.is_image());
    }

    #[test]
    fn probe_detects_png() {
        assert_eq!(probe(&png_bytes(3, 2)), Ok(ImageFormat::Png));
    }

    #[test]
    fn probe_rejects_garbage() {
        assert!(probe(b"definitely not an image").is_err());
    }

    #[tokio::test]
    async fn non_images_rejected_without_reading() {
        // Path does not exist: if it were read we'd get ReadFailed instead.
        let files = vec![SourceFile::from_path("/no/such/dir/readme.txt")];
        let outcome = ingest(files, 4).await;
        assert!(outcome.accepted.is_empty());
        assert!(matches!(
            outcome.rejected.as_slice(),
            [IngestError::NotAnImage { .. }]
        ));
    }

    #[tokio::test]
    async fn missing_file_is_read_failure() {
        let files = vec![SourceFile::from_path("/no/such/dir/photo.png")];
        let outcome = ingest(files, 4).await;
        assert!(matches!(
            outcome.rejected.as_slice(),
            [IngestError::ReadFailed { .. }]
        ));
    }

    #[tokio::test]
    async fn accepted_keep_input_order() {
        // Bigger images take longer to probe; order must still hold.
        let files = vec![
            SourceFile::from_bytes("big.png", Some("image/png".into()), png_bytes(900, 700)),
            SourceFile::from_bytes("bad.png", Some("image/png".into()), b"nope".to_vec()),
            SourceFile::from_bytes("small.png", Some("image/png".into()), png_bytes(2, 2)),
        ];
        let outcome = ingest(files, 8).await;
        let names: Vec<&str> = outcome.accepted.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["big.png", "small.png"]);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].name(), "bad.png");
    }
}
