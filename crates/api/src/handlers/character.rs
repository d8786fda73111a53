//! Handlers for the `/character` resource and its images.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gamevault_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use validator::Validate;

use super::images::{read_upload, zip_response};
use super::require_entity_id;
use crate::error::AppResult;
use crate::query::SearchParams;
use crate::state::AppState;

const ENTITY: &str = "Character";

/// GET /character?search=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Character>>> {
    let characters = state.characters.list(params.search.as_deref()).await?;
    Ok(Json(characters))
}

/// GET /character/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Character>> {
    require_entity_id(ENTITY, &id)?;
    let character = state.characters.get(&id).await?;
    Ok(Json(character))
}

/// POST /character
///
/// Unknown game ids are dropped before insert. Each remaining game gets
/// this character's id added in the background.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let (character, _) = state.characters.create(Character::from(input)).await?;
    let location = format!("/character/{}", character.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(character)))
}

/// PUT /character/{id}
///
/// Replaces the stored character wholesale. Game links are not revisited.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<StatusCode> {
    require_entity_id(ENTITY, &id)?;
    input.validate()?;
    state.characters.update(&id, input.into_character(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /character/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    require_entity_id(ENTITY, &id)?;
    state.characters.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /character/UploadImage
///
/// Multipart form with `characterId` and `file`. Answers 400 when the
/// character does not exist.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let upload = read_upload(multipart, "characterId").await?;
    let character = state
        .characters
        .upload_image(&upload.entity_id, &upload.file_name, &upload.content)
        .await?;
    tracing::info!(
        character_id = %character.id,
        file_name = %upload.file_name,
        bytes = upload.content.len(),
        "Stored character image"
    );
    let location = format!("/character/{}/images/zip", character.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(character)))
}

/// GET /character/{id}/images/zip
pub async fn download_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    require_entity_id(ENTITY, &id)?;
    let bundle = state.characters.download_images(&id).await?;
    Ok(zip_response(bundle))
}

/// DELETE /character/{id}/image/{file_name}
pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, file_name)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    require_entity_id(ENTITY, &id)?;
    state.characters.delete_image(&id, &file_name).await?;
    Ok(StatusCode::NO_CONTENT)
}
