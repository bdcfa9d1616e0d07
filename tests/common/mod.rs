//! Shared fixtures: generated images and PDF read-back helpers.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imgs2pdf::SourceFile;
use lopdf::Document;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encode a solid-colour `w × h` image in `format`.
pub fn image_bytes(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([200, 120, 40])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .expect("fixture encoding");
    buf
}

/// In-memory PNG blob declared as `image/png`.
pub fn png_file(name: &str, w: u32, h: u32) -> SourceFile {
    SourceFile::from_bytes(name, Some("image/png".into()), image_bytes(w, h, ImageFormat::Png))
}

/// Write a fixture image to `dir/name`, format chosen by extension.
pub fn write_image(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    let format = ImageFormat::from_path(&path).expect("image extension");
    std::fs::write(&path, image_bytes(w, h, format)).expect("write fixture");
    path
}

/// Intrinsic pixel size of the image on each page, in page order.
pub fn page_image_sizes(pdf: &[u8]) -> Vec<(i64, i64)> {
    let doc = Document::load_mem(pdf).expect("valid pdf");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).expect("page dict");
            let resources = page
                .get(b"Resources")
                .and_then(|r| r.as_dict())
                .expect("inline resources");
            let xobjects = resources
                .get(b"XObject")
                .and_then(|x| x.as_dict())
                .expect("xobjects");
            let (_, reference) = xobjects.iter().next().expect("one image per page");
            let stream = doc
                .get_object(reference.as_reference().expect("reference"))
                .and_then(|o| o.as_stream())
                .expect("image stream");
            let w = stream.dict.get(b"Width").and_then(|v| v.as_i64()).expect("width");
            let h = stream.dict.get(b"Height").and_then(|v| v.as_i64()).expect("height");
            (w, h)
        })
        .collect()
}

pub fn page_count(pdf: &[u8]) -> usize {
    Document::load_mem(pdf).expect("valid pdf").get_pages().len()
}
