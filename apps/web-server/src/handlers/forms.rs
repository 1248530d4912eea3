//! Multipart post form parsing.

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

use yatube_core::ports::ImageUpload;
use yatube_core::services::PostForm;

use crate::middleware::error::AppError;

/// Largest accepted image upload.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Largest accepted text field.
const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Read the `text`, `group` and `image` fields of a post form.
///
/// Unknown fields, including `author`, are drained and ignored.
pub async fn read_post_form(mut payload: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();

    while let Some(field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "text" => form.text = read_text(field).await?,
            "group" => form.group = Some(read_text(field).await?),
            "image" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);
                let data = read_bytes(field, MAX_IMAGE_BYTES).await?;
                if !data.is_empty() {
                    form.image = Some(ImageUpload { filename, data });
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unexpected form field");
                read_bytes(field, MAX_TEXT_BYTES).await?;
            }
        }
    }

    Ok(form)
}

async fn read_text(field: Field) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    let data = read_bytes(field, MAX_TEXT_BYTES).await?;
    String::from_utf8(data).map_err(|_| AppError::BadRequest(format!("{name} is not valid UTF-8")))
}

async fn read_bytes(mut field: Field, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();

    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if data.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Field exceeds {limit} bytes"
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}
