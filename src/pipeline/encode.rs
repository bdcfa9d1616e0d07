//! Image encoding: payload bytes → decoded pixels → baseline JPEG.
//!
//! Every page image is embedded as a `DCTDecode` stream regardless of its
//! source format, so PNG/GIF/WebP inputs are flattened to RGB and
//! re-encoded at the configured quality. Transparent areas are composited
//! onto white so they read as blank page, not as whatever colour the
//! invisible pixels happen to store.

use crate::config::ImageQuality;
use crate::content::ImagePayload;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba};
use tracing::debug;

/// A JPEG stream ready to be written as an image XObject.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub jpeg: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Decode the payload to pixels. Width and height are the intrinsic size.
pub fn decode_payload(payload: &ImagePayload) -> Result<DynamicImage, image::ImageError> {
    image::load_from_memory_with_format(payload.bytes(), payload.format())
}

/// Re-encode decoded pixels as RGB JPEG at `quality`.
pub fn encode_jpeg(img: &DynamicImage, quality: ImageQuality) -> Result<EncodedImage, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(flatten_onto_white(img));
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality()))?;

    debug!(
        "Encoded {}x{} image → {} bytes JPEG (q={})",
        rgb.width(),
        rgb.height(),
        jpeg.len(),
        quality.jpeg_quality()
    );

    Ok(EncodedImage {
        jpeg,
        width_px: rgb.width(),
        height_px: rgb.height(),
    })
}

/// Drop the alpha channel by blending each pixel over white.
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let over_white = |c: u8| {
            let (c, a) = (u16::from(c), u16::from(a));
            // At most 255 * 255 + 127, so u16 holds it.
            ((a * c + (255 - a) * 255 + 127) / 255) as u8
        };
        Rgb([over_white(r), over_white(g), over_white(b)])
    })
}
