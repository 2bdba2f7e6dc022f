use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use lesson_core::model::Bitmap;

/// Encode the bitmap as a `data:image/png;base64,...` URL for an `img` tag.
/// `None` if PNG encoding fails.
#[must_use]
pub fn canvas_data_url(bitmap: &Bitmap) -> Option<String> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(
            bitmap.rgba(),
            bitmap.width(),
            bitmap.height(),
            image::ExtendedColorType::Rgba8,
        )
        .ok()?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    Some(format!("data:image/png;base64,{encoded}"))
}
