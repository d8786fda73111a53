pub mod character;
pub mod game;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the catalog route tree.
///
/// Route hierarchy:
///
/// ```text
/// /game                                  list, create
/// /game/UploadImage                      multipart image upload
/// /game/{id}                             get, replace, delete
/// /game/{id}/images/zip                  download all images
/// /game/{id}/image/{file_name}           delete one image
///
/// /character                             (same shape as /game)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/game", game::router())
        .nest("/character", character::router())
}
