//! Route definitions for the `/character` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/character`.
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
        .route("/", get(character::list).post(character::create))
        .route("/UploadImage", post(character::upload_image))
        .route(
            "/{id}",
            get(character::get_by_id).put(character::update).delete(character::delete),
        )
        .route("/{id}/images/zip", get(character::download_images))
        .route("/{id}/image/{file_name}", delete(character::delete_image))
}
