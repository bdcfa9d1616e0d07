//! Export sequencer: content list in, single PDF out.
//!
//! Pages are produced strictly in list order. Each item's image is decoded
//! and placed before the next page is even appended, so page `n` of the
//! document is always item `n - 1` of the list. Any failure aborts the whole
//! export; no partial document is returned or written.

use crate::config::{ExportConfig, ImageQuality};
use crate::content::{ContentList, PageItem};
use crate::error::ExportError;
use crate::output::{ExportOutput, ExportStats, PagePlacement};
use crate::pipeline::encode::{self, EncodedImage};
use crate::pipeline::layout::PageGeometry;
use crate::pipeline::pdf::PdfWriter;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Render every item of `list` onto its own page.
///
/// # Errors
/// - [`ExportError::EmptyList`] if there is nothing to export
/// - [`ExportError::DecodeFailed`] / [`ExportError::EncodeFailed`] if any
///   image cannot be processed
/// - [`ExportError::PdfWriteFailed`] if serialisation fails
pub async fn export(list: &ContentList, config: &ExportConfig) -> Result<ExportOutput, ExportError> {
    let start = Instant::now();
    if list.is_empty() {
        return Err(ExportError::EmptyList);
    }

    let total = list.len();
    let geometry = PageGeometry::from_config(config);
    info!(
        "Exporting {} pages ({} {:?}, {:.1}×{:.1}mm, margin {}mm)",
        total,
        config.page_size,
        config.orientation,
        geometry.page_width,
        geometry.page_height,
        geometry.margin
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_export_start(total);
    }

    let result = sequence_pages(list, config, &geometry).await;

    if let Some(ref cb) = config.progress_callback {
        cb.on_export_complete(total, result.is_ok());
    }

    let (pdf, pages) = result.inspect_err(|e| error!("Export failed: {}", e))?;

    let stats = ExportStats {
        page_count: pages.len(),
        pdf_bytes: pdf.len(),
        page_width_mm: geometry.page_width,
        page_height_mm: geometry.page_height,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Export complete: {} pages, {} bytes, {}ms",
        stats.page_count, stats.pdf_bytes, stats.total_duration_ms
    );

    Ok(ExportOutput {
        pdf,
        file_name: config.file_name(),
        saved_path: None,
        pages,
        stats,
    })
}

/// Export and save the document as `<dir>/<file_name>`.
///
/// The bytes go to a [`tempfile::NamedTempFile`] in `dir` that is persisted
/// over the target name only once fully written, so a failed export never
/// leaves a truncated PDF behind.
pub async fn export_to_dir(
    list: &ContentList,
    dir: impl AsRef<Path>,
    config: &ExportConfig,
) -> Result<ExportOutput, ExportError> {
    let mut output = export(list, config).await?;
    let dir = dir.as_ref().to_path_buf();
    let path = dir.join(&output.file_name);

    let pdf = std::mem::take(&mut output.pdf);
    let target = path.clone();
    let (pdf, written) = tokio::task::spawn_blocking(move || {
        let written = write_atomic(&dir, &target, &pdf);
        (pdf, written)
    })
    .await
    .map_err(|e| ExportError::Internal(format!("Write task panicked: {}", e)))?;
    output.pdf = pdf;

    written.map_err(|e| ExportError::OutputWriteFailed {
        path: path.clone(),
        source: e,
    })?;

    info!("Saved {}", path.display());
    output.saved_path = Some(path);
    Ok(output)
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Synchronous wrapper around [`export`].
///
/// Creates a temporary tokio runtime internally.
pub fn export_sync(list: &ContentList, config: &ExportConfig) -> Result<ExportOutput, ExportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExportError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(export(list, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn sequence_pages(
    list: &ContentList,
    config: &ExportConfig,
    geometry: &PageGeometry,
) -> Result<(Vec<u8>, Vec<PagePlacement>), ExportError> {
    let total = list.len();
    let mut writer = PdfWriter::new(geometry.page_width, geometry.page_height);
    let mut pages = Vec::with_capacity(total);

    for (idx, item) in list.iter().enumerate() {
        let page_num = idx + 1;
        // Item 0 goes on the document's implicit first page.
        if idx > 0 {
            writer.add_page()?;
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }

        let encoded = match prepare_image(item, page_num, config.image_quality).await {
            Ok(encoded) => encoded,
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total, &e.to_string());
                }
                return Err(e);
            }
        };

        let placement = geometry.place(encoded.width_px, encoded.height_px);
        let jpeg_bytes = encoded.jpeg.len();
        debug!(
            "Page {}: '{}' {}x{}px → {:.1}×{:.1}mm at ({:.1}, {:.1})",
            page_num,
            item.display_name,
            encoded.width_px,
            encoded.height_px,
            placement.width,
            placement.height,
            placement.x,
            placement.y
        );

        pages.push(PagePlacement {
            page_num,
            item_id: item.id,
            display_name: item.display_name.clone(),
            width_px: encoded.width_px,
            height_px: encoded.height_px,
            placement,
            jpeg_bytes,
        });
        writer.place_jpeg(encoded, &placement);

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total, jpeg_bytes);
        }
    }

    let pdf = writer.finish(&config.file_stem())?;
    Ok((pdf, pages))
}

/// Decode and JPEG-encode one item off the async executor.
async fn prepare_image(
    item: &PageItem,
    page_num: usize,
    quality: ImageQuality,
) -> Result<EncodedImage, ExportError> {
    let payload = item.image.clone();
    let name = item.display_name.clone();

    tokio::task::spawn_blocking(move || {
        let img = encode::decode_payload(&payload).map_err(|e| ExportError::DecodeFailed {
            page: page_num,
            name: name.clone(),
            detail: e.to_string(),
        })?;
        if img.width() == 0 || img.height() == 0 {
            return Err(ExportError::DecodeFailed {
                page: page_num,
                name,
                detail: "image has no area".into(),
            });
        }
        encode::encode_jpeg(&img, quality).map_err(|e| ExportError::EncodeFailed {
            page: page_num,
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| ExportError::Internal(format!("Image task panicked: {}", e)))?
}
