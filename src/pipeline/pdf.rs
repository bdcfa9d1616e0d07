//! PDF assembly with lopdf: a page tree of single-image pages.
//!
//! [`PdfWriter`] mirrors the small surface the export sequencer needs:
//! open a document (which starts with one implicit page), append pages,
//! place a JPEG on the current page, and serialise.
//!
//! Placements arrive in millimetres with a top-left origin. PDF user space
//! is points with a bottom-left origin, so `y` is flipped on the way in.

use crate::error::ExportError;
use crate::pipeline::encode::EncodedImage;
use crate::pipeline::layout::Placement;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

/// Points per millimetre.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

const PRODUCER: &str = concat!("imgs2pdf ", env!("CARGO_PKG_VERSION"));

/// Content and resources of the page currently being drawn.
#[derive(Default)]
struct PageDraft {
    xobjects: Dictionary,
    operations: Vec<Operation>,
}

/// Incrementally built document with uniform page size.
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page_width_mm: f64,
    page_height_mm: f64,
    current: PageDraft,
    images_placed: usize,
}

impl PdfWriter {
    /// Open a document whose pages are `page_width_mm × page_height_mm`.
    /// The first page exists immediately.
    pub fn new(page_width_mm: f64, page_height_mm: f64) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            page_width_mm,
            page_height_mm,
            current: PageDraft::default(),
            images_placed: 0,
        }
    }

    /// Pages so far, including the one being drawn.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    /// Close the current page and start a fresh one.
    pub fn add_page(&mut self) -> Result<(), ExportError> {
        self.flush_page()
    }

    /// Draw `image` on the current page at `at` (millimetres, top-left origin).
    pub fn place_jpeg(&mut self, image: EncodedImage, at: &Placement) {
        self.images_placed += 1;
        let name = format!("Im{}", self.images_placed);

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width_px),
                "Height" => i64::from(image.height_px),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.jpeg,
        )
        // Already DCT-compressed; Flate on top only costs time.
        .with_compression(false);
        let image_id = self.doc.add_object(stream);
        self.current.xobjects.set(name.as_bytes().to_vec(), image_id);

        let w = at.width * MM_TO_PT;
        let h = at.height * MM_TO_PT;
        let x = at.x * MM_TO_PT;
        let y = (self.page_height_mm - at.y - at.height) * MM_TO_PT;

        self.current.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(w),
                    0.into(),
                    0.into(),
                    real(h),
                    real(x),
                    real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// Close the last page, build the page tree and serialise to bytes.
    pub fn finish(mut self, title: &str) -> Result<Vec<u8>, ExportError> {
        self.flush_page()?;

        let count = self.page_ids.len() as i64;
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        self.doc.set_object(
            self.pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            },
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(PRODUCER),
        });
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| ExportError::PdfWriteFailed(e.to_string()))?;
        debug!("Serialised {} pages → {} bytes", count, buffer.len());
        Ok(buffer)
    }

    fn flush_page(&mut self) -> Result<(), ExportError> {
        let draft = std::mem::take(&mut self.current);
        let content = Content {
            operations: draft.operations,
        };
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => draft.xobjects,
            },
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(self.page_width_mm * MM_TO_PT),
                real(self.page_height_mm * MM_TO_PT),
            ],
        });
        self.page_ids.push(page_id);
        Ok(())
    }
}

fn real(v: f64) -> Object {
    (v as f32).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_jpeg(w: u32, h: u32) -> EncodedImage {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(w, h));
        crate::pipeline::encode::encode_jpeg(&img, crate::config::ImageQuality::Low).unwrap()
    }

    fn image_widths(bytes: &[u8]) -> Vec<i64> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let page = doc.get_dictionary(page_id).unwrap();
                let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
                let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
                let (_, reference) = xobjects.iter().next().unwrap();
                let stream = doc
                    .get_object(reference.as_reference().unwrap())
                    .unwrap()
                    .as_stream()
                    .unwrap();
                stream.dict.get(b"Width").unwrap().as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn new_document_has_one_implicit_page() {
        let writer = PdfWriter::new(210.0, 297.0);
        assert_eq!(writer.page_count(), 1);
        let bytes = writer.finish("empty").unwrap();
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn pages_keep_placement_order() {
        let mut writer = PdfWriter::new(210.0, 297.0);
        let at = Placement {
            x: 15.0,
            y: 15.0,
            width: 180.0,
            height: 100.0,
        };
        writer.place_jpeg(tiny_jpeg(30, 10), &at);
        writer.add_page().unwrap();
        writer.place_jpeg(tiny_jpeg(20, 10), &at);
        writer.add_page().unwrap();
        writer.place_jpeg(tiny_jpeg(10, 10), &at);
        assert_eq!(writer.page_count(), 3);

        let bytes = writer.finish("order").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(image_widths(&bytes), vec![30, 20, 10]);
    }

    #[test]
    fn media_box_is_in_points() {
        let writer = PdfWriter::new(210.0, 297.0);
        let bytes = writer.finish("a4").unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, &page_id) = doc.get_pages().iter().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .clone();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((width - 595.28).abs() < 0.01, "width {width}");
        assert!((height - 841.89).abs() < 0.01, "height {height}");
    }
}
