//! Handlers for the `/game` resource and its images.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gamevault_db::models::game::{CreateGame, Game, UpdateGame};
use validator::Validate;

use super::images::{read_upload, zip_response};
use super::require_entity_id;
use crate::error::AppResult;
use crate::query::SearchParams;
use crate::state::AppState;

const ENTITY: &str = "Game";

/// GET /game?search=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Game>>> {
    let games = state.games.list(params.search.as_deref()).await?;
    Ok(Json(games))
}

/// GET /game/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Game>> {
    require_entity_id(ENTITY, &id)?;
    let game = state.games.get(&id).await?;
    Ok(Json(game))
}

/// POST /game
///
/// Unknown character ids are dropped before insert. Each remaining
/// character gets this game's id added in the background.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateGame>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let (game, _) = state.games.create(Game::from(input)).await?;
    let location = format!("/game/{}", game.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(game)))
}

/// PUT /game/{id}
///
/// Replaces the stored game wholesale. Character links are not revisited.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateGame>,
) -> AppResult<StatusCode> {
    require_entity_id(ENTITY, &id)?;
    input.validate()?;
    state.games.update(&id, input.into_game(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /game/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    require_entity_id(ENTITY, &id)?;
    state.games.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /game/UploadImage
///
/// Multipart form with `gameId` and `file`. Answers 400 when the game does
/// not exist.
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let upload = read_upload(multipart, "gameId").await?;
    let game = state
        .games
        .upload_image(&upload.entity_id, &upload.file_name, &upload.content)
        .await?;
    tracing::info!(
        game_id = %game.id,
        file_name = %upload.file_name,
        bytes = upload.content.len(),
        "Stored game image"
    );
    let location = format!("/game/{}/images/zip", game.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(game)))
}

/// GET /game/{id}/images/zip
pub async fn download_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    require_entity_id(ENTITY, &id)?;
    let bundle = state.games.download_images(&id).await?;
    Ok(zip_response(bundle))
}

/// DELETE /game/{id}/image/{file_name}
pub async fn delete_image(
    State(state): State<AppState>,
    Path((id, file_name)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    require_entity_id(ENTITY, &id)?;
    state.games.delete_image(&id, &file_name).await?;
    Ok(StatusCode::NO_CONTENT)
}
