use image::ImageFormat;

use yatube_core::ports::ImageError;

/// Sniff the format of `data` and make sure it fully decodes.
///
/// Returns the file extension images of that format are stored under.
pub fn detect_image(data: &[u8]) -> Result<&'static str, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Invalid("empty file".to_string()));
    }

    let format = image::guess_format(data).map_err(|e| ImageError::Invalid(e.to_string()))?;
    let extension = match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        other => {
            return Err(ImageError::Invalid(format!(
                "unsupported format {other:?}"
            )));
        }
    };

    // A valid header is not enough; truncated files must be rejected too.
    image::load_from_memory_with_format(data, format)
        .map_err(|e| ImageError::Invalid(e.to_string()))?;

    Ok(extension)
}
