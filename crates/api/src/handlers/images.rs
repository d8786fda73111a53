//! Multipart upload parsing and zip download responses shared by the game
//! and character image endpoints.

use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use gamevault_core::images::ImageBundle;

use crate::error::{AppError, AppResult};

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// A parsed image upload form.
#[derive(Debug)]
pub struct ImageUpload {
    pub entity_id: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Read an upload form with an id field named `id_field` and a `file` field.
///
/// Field names are matched case-insensitively; unknown fields are ignored.
pub async fn read_upload(mut multipart: Multipart, id_field: &str) -> AppResult<ImageUpload> {
    let mut entity_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name.eq_ignore_ascii_case(id_field) {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            entity_id = Some(text.trim().to_string());
        } else if name.eq_ignore_ascii_case(FILE_FIELD) {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| AppError::BadRequest("Uploaded file has no name".into()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((file_name, data.to_vec()));
        }
    }

    let entity_id = entity_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required '{id_field}' field")))?;
    let (file_name, content) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    Ok(ImageUpload {
        entity_id,
        file_name,
        content,
    })
}

/// 200 with the archive as an attachment, or 204 when there is nothing to
/// bundle.
pub fn zip_response(bundle: Option<ImageBundle>) -> Response {
    let Some(bundle) = bundle else {
        return StatusCode::NO_CONTENT.into_response();
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", bundle.file_name),
            ),
        ],
        bundle.content,
    )
        .into_response()
}
