//! Route definitions for the `/game` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::game;
use crate::state::AppState;

/// Routes mounted at `/game`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// POST   /UploadImage               -> upload_image
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// GET    /{id}/images/zip           -> download_images
/// DELETE /{id}/image/{file_name}    -> delete_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(game::list).post(game::create))
        .route("/UploadImage", post(game::upload_image))
        .route(
            "/{id}",
            get(game::get_by_id).put(game::update).delete(game::delete),
        )
        .route("/{id}/images/zip", get(game::download_images))
        .route("/{id}/image/{file_name}", delete(game::delete_image))
}
